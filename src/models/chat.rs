use chrono::Utc;
use serde::{ Deserialize, Serialize };
use std::collections::HashSet;

use crate::error::ChatError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

/// One turn of a conversation, in the shape shared with the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
}

impl Message {
    pub fn user(id: String, content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id,
            role: Role::User,
            content: content.into(),
            timestamp,
        }
    }

    /// An empty assistant turn that streamed deltas are folded into.
    pub fn placeholder(id: String, timestamp: i64) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: String::new(),
            timestamp,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub messages: Vec<Message>,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

impl Conversation {
    pub fn validate(&self) -> Result<(), ChatError> {
        if self.id.is_empty() {
            return Err(ChatError::Schema("conversation id is empty".to_string()));
        }
        let mut seen = HashSet::with_capacity(self.messages.len());
        for message in &self.messages {
            if message.id.is_empty() {
                return Err(ChatError::Schema("message id is empty".to_string()));
            }
            if !seen.insert(message.id.as_str()) {
                return Err(
                    ChatError::Schema(
                        format!("duplicate message id '{}' in conversation {}", message.id, self.id)
                    )
                );
            }
        }
        Ok(())
    }
}

/// Hands out client-side message ids.
///
/// Ids are the creation time in epoch milliseconds, bumped forward whenever
/// two turns are created within the same millisecond, so every id issued in a
/// session is unique and strictly increasing.
#[derive(Debug, Default)]
pub struct IdClock {
    last: i64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(id, timestamp)` for a turn created now.
    pub fn next(&mut self) -> (String, i64) {
        self.next_at(Utc::now().timestamp_millis())
    }

    fn next_at(&mut self, now_ms: i64) -> (String, i64) {
        let id = if now_ms > self.last { now_ms } else { self.last + 1 };
        self.last = id;
        (id.to_string(), now_ms)
    }
}
