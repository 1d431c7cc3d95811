use crate::models::chat::Message;

/// Ordered turns of the active conversation.
///
/// Only the final element can change after insertion; everything before it is
/// settled history.
#[derive(Debug, Default, Clone)]
pub struct MessageStore {
    messages: Vec<Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replaces the final turn and returns what it held. Does nothing on an
    /// empty store.
    pub fn replace_last(&mut self, message: Message) -> Option<Message> {
        self.messages.last_mut().map(|last| std::mem::replace(last, message))
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;

    #[test]
    fn replace_last_on_empty_store_is_noop() {
        let mut store = MessageStore::new();
        let previous = store.replace_last(Message::placeholder("1".to_string(), 0));
        assert!(previous.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn replace_last_leaves_history_untouched() {
        let mut store = MessageStore::new();
        store.append(Message::user("1".to_string(), "Hello", 1));
        store.append(Message::placeholder("2".to_string(), 2));

        let mut updated = Message::placeholder("2".to_string(), 2);
        updated.content.push_str("Hi");
        let previous = store.replace_last(updated).unwrap();

        assert_eq!(previous.content, "");
        assert_eq!(store.len(), 2);
        assert_eq!(store.messages()[0].content, "Hello");
        assert_eq!(store.last().unwrap().content, "Hi");
    }

    #[test]
    fn replace_last_may_change_identity() {
        let mut store = MessageStore::new();
        store.append(Message::placeholder("local".to_string(), 1));
        store.replace_last(Message {
            id: "server".to_string(),
            role: Role::Assistant,
            content: "done".to_string(),
            timestamp: 9,
        });
        assert_eq!(store.last().unwrap().id, "server");
        assert_eq!(store.len(), 1);
    }
}
