use chrono::Utc;
use log::{ error, info };
use std::sync::Arc;

use crate::client::ChatBackend;
use crate::error::ChatError;
use crate::models::chat::{ Conversation, IdClock, Message };
use crate::store::MessageStore;
use crate::stream::{ StreamConsumer, StreamOutcome };
use crate::ui::ChatView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationState {
    /// Creation has not been attempted yet.
    Pending,
    Ready {
        id: String,
        created_at: i64,
    },
    /// Creation failed. Sending stays disabled for the rest of the session.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyInput,
    NoConversation,
    /// A reply is still streaming. Only reachable once the session is shared
    /// behind a lock, since `send` borrows it mutably.
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Nothing was sent and the store was left alone.
    Rejected(RejectReason),
    Completed(StreamOutcome),
    /// The exchange broke off; whatever was already streamed stays in the store.
    Failed,
}

/// Everything one chat session owns: the conversation it talks in, the turns
/// shown so far, and whether a reply is currently streaming.
pub struct Session {
    backend: Arc<dyn ChatBackend>,
    state: ConversationState,
    store: MessageStore,
    ids: IdClock,
    busy: bool,
}

impl Session {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            state: ConversationState::Pending,
            store: MessageStore::new(),
            ids: IdClock::new(),
            busy: false,
        }
    }

    /// Asks the backend for a conversation. Only the first call does any
    /// work; later calls report the outcome of that first attempt.
    pub async fn initialize(&mut self) -> bool {
        if self.state != ConversationState::Pending {
            return self.conversation_id().is_some();
        }
        match self.backend.create_conversation().await {
            Ok(id) => {
                info!("Conversation ready: {}", id);
                self.state = ConversationState::Ready {
                    id,
                    created_at: Utc::now().timestamp_millis(),
                };
                true
            }
            Err(e) => {
                error!("Failed to create conversation: {}", e);
                self.state = ConversationState::Failed;
                false
            }
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn conversation_id(&self) -> Option<&str> {
        match &self.state {
            ConversationState::Ready { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn can_send(&self) -> bool {
        self.conversation_id().is_some() && !self.busy
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    /// Snapshot of the session in the shared wire shape.
    pub fn conversation(&self) -> Option<Conversation> {
        match &self.state {
            ConversationState::Ready { id, created_at } =>
                Some(Conversation {
                    id: id.clone(),
                    messages: self.store.messages().to_vec(),
                    created_at: *created_at,
                }),
            _ => None,
        }
    }

    /// Sends one user turn and streams the reply into the store.
    pub async fn send(&mut self, input: &str, view: &mut dyn ChatView) -> SendOutcome {
        let content = input.trim();
        if content.is_empty() {
            return SendOutcome::Rejected(RejectReason::EmptyInput);
        }
        let conversation_id = match self.conversation_id() {
            Some(id) => id.to_string(),
            None => {
                return SendOutcome::Rejected(RejectReason::NoConversation);
            }
        };
        if self.busy {
            return SendOutcome::Rejected(RejectReason::Busy);
        }

        let (id, timestamp) = self.ids.next();
        let user_message = Message::user(id, content, timestamp);
        self.store.append(user_message.clone());
        view.message_appended(&user_message);
        self.set_busy(true, view);

        let outcome = match self.exchange(&conversation_id, content, view).await {
            Ok(streamed) => SendOutcome::Completed(streamed),
            Err(e) => {
                error!("Error sending message: {}", e);
                SendOutcome::Failed
            }
        };

        self.set_busy(false, view);
        view.exchange_finished();
        outcome
    }

    async fn exchange(
        &mut self,
        conversation_id: &str,
        content: &str,
        view: &mut dyn ChatView
    ) -> Result<StreamOutcome, ChatError> {
        // Refused or unreachable requests return here, before any placeholder exists.
        let body = self.backend.send_message(conversation_id, content).await?;

        let (id, timestamp) = self.ids.next();
        let consumer = StreamConsumer::begin(
            &mut self.store,
            view,
            Message::placeholder(id, timestamp)
        );
        consumer.consume(body, &mut self.store, view).await
    }

    fn set_busy(&mut self, busy: bool, view: &mut dyn ChatView) {
        self.busy = busy;
        view.busy_changed(busy);
    }
}
