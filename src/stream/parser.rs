use crate::models::stream::StreamEvent;

pub const DATA_PREFIX: &str = "data:";

/// What a single line of the reply stream turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Event(StreamEvent),
    /// Blank lines, keep-alives, comments and anything without the data prefix.
    Ignored,
    Malformed {
        payload: String,
        error: String,
    },
}

/// Per-line progress: a raw line is waiting for classification, its payload
/// has been cut out behind the data prefix, or it has been fully parsed.
#[derive(Debug)]
enum LineState<'a> {
    AwaitingLine(&'a str),
    HavePrefix(&'a str),
    Parsed(Record),
}

impl<'a> LineState<'a> {
    fn advance(self) -> LineState<'a> {
        match self {
            LineState::AwaitingLine(line) => {
                let line = line.strip_suffix('\r').unwrap_or(line);
                match line.strip_prefix(DATA_PREFIX) {
                    Some(payload) => {
                        LineState::HavePrefix(payload.strip_prefix(' ').unwrap_or(payload))
                    }
                    None => LineState::Parsed(Record::Ignored),
                }
            }
            LineState::HavePrefix(payload) => {
                match serde_json::from_str::<StreamEvent>(payload) {
                    Ok(event) => LineState::Parsed(Record::Event(event)),
                    Err(e) =>
                        LineState::Parsed(Record::Malformed {
                            payload: payload.to_string(),
                            error: e.to_string(),
                        }),
                }
            }
            parsed @ LineState::Parsed(_) => parsed,
        }
    }

    fn parse(line: &'a str) -> Record {
        let mut state = LineState::AwaitingLine(line);
        loop {
            state = match state {
                LineState::Parsed(record) => {
                    return record;
                }
                other => other.advance(),
            };
        }
    }
}

/// Splits decoded text into newline-delimited records.
///
/// Text arrives in arbitrary pieces; anything after the last newline is kept
/// until the rest of the line shows up or the stream ends.
#[derive(Debug, Default)]
pub struct RecordParser {
    buffer: String,
}

impl RecordParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: &str) -> Vec<Record> {
        // The buffer never holds a newline between pushes, so only new text
        // needs scanning.
        let mut from = self.buffer.len();
        self.buffer.push_str(text);
        let mut records = Vec::new();
        while let Some(offset) = self.buffer[from..].find('\n') {
            let line: String = self.buffer.drain(..=from + offset).collect();
            records.push(LineState::parse(&line[..line.len() - 1]));
            from = 0;
        }
        records
    }

    /// Parses a final line that was never newline-terminated.
    pub fn finish(&mut self) -> Option<Record> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.buffer);
        Some(LineState::parse(&line))
    }

    #[cfg(test)]
    fn buffered(&self) -> &str {
        &self.buffer
    }
}
