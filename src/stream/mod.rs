pub mod decoder;
pub mod parser;

use bytes::Bytes;
use futures::{ Stream, StreamExt };
use log::{ debug, warn };

use crate::error::ChatError;
use crate::models::chat::Message;
use crate::models::stream::StreamEvent;
use crate::store::MessageStore;
use crate::ui::ChatView;
use self::decoder::Utf8Decoder;
use self::parser::{ Record, RecordParser };

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    /// The assistant turn as it stands in the store once the stream ended.
    pub message: Message,
    /// Whether a `done` event finalized the turn.
    pub completed: bool,
    /// Records that carried the data prefix but could not be parsed.
    pub skipped: usize,
}

/// Folds one reply stream into the last turn of a [`MessageStore`].
pub struct StreamConsumer {
    decoder: Utf8Decoder,
    parser: RecordParser,
    current: Message,
    completed: bool,
    skipped: usize,
}

impl StreamConsumer {
    /// Appends `placeholder` to the store so deltas have somewhere to land.
    pub fn begin(store: &mut MessageStore, view: &mut dyn ChatView, placeholder: Message) -> Self {
        store.append(placeholder.clone());
        view.message_appended(&placeholder);
        Self {
            decoder: Utf8Decoder::new(),
            parser: RecordParser::new(),
            current: placeholder,
            completed: false,
            skipped: 0,
        }
    }

    pub async fn consume<S>(
        mut self,
        mut body: S,
        store: &mut MessageStore,
        view: &mut dyn ChatView
    ) -> Result<StreamOutcome, ChatError>
        where S: Stream<Item = Result<Bytes, ChatError>> + Unpin
    {
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            self.feed(&chunk, store, view);
        }
        Ok(self.finish(store, view))
    }

    pub fn feed(&mut self, bytes: &[u8], store: &mut MessageStore, view: &mut dyn ChatView) {
        let text = self.decoder.decode(bytes);
        for record in self.parser.push(&text) {
            self.apply(record, store, view);
        }
    }

    pub fn finish(mut self, store: &mut MessageStore, view: &mut dyn ChatView) -> StreamOutcome {
        let tail = self.decoder.finish();
        for record in self.parser.push(&tail) {
            self.apply(record, store, view);
        }
        if let Some(record) = self.parser.finish() {
            self.apply(record, store, view);
        }
        if !self.completed {
            debug!("Stream ended without done event; keeping {} streamed chars", self.current.content.len());
        }
        StreamOutcome {
            message: self.current,
            completed: self.completed,
            skipped: self.skipped,
        }
    }

    fn apply(&mut self, record: Record, store: &mut MessageStore, view: &mut dyn ChatView) {
        match record {
            Record::Ignored => {}
            Record::Malformed { payload, error } => {
                self.skipped += 1;
                warn!("Skipping malformed stream record ({}): {}", error, payload);
            }
            Record::Event(StreamEvent::Unknown) => {
                debug!("Ignoring stream event of unknown type");
            }
            Record::Event(event) if self.completed => {
                warn!("Ignoring event received after done: {:?}", event);
            }
            Record::Event(StreamEvent::Chunk { content }) => {
                self.current.content.push_str(&content);
                self.publish(store, view);
            }
            Record::Event(StreamEvent::Done { message }) => {
                self.current = message;
                self.completed = true;
                self.publish(store, view);
            }
        }
    }

    fn publish(&self, store: &mut MessageStore, view: &mut dyn ChatView) {
        if let Some(previous) = store.replace_last(self.current.clone()) {
            view.last_replaced(&previous, &self.current);
        }
    }
}
