pub mod http;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::ChatError;
use self::http::HttpBackend;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ChatError>> + Send>>;

/// The backend this client talks to: it creates conversations and answers
/// messages with a streamed reply body.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn create_conversation(&self) -> Result<String, ChatError>;

    /// Posts `content` and returns the raw reply body once the backend has
    /// accepted the request.
    async fn send_message(
        &self,
        conversation_id: &str,
        content: &str
    ) -> Result<ByteStream, ChatError>;
}

pub fn new_backend(config: &ClientConfig) -> Result<Arc<dyn ChatBackend>, ChatError> {
    let backend = HttpBackend::from_config(config)?;
    Ok(Arc::new(backend))
}
