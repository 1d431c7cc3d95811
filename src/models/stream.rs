use serde::{ Serialize, Deserialize };

use super::chat::Message;

/// One event carried by a `data:` record of a reply stream.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum StreamEvent {
    #[serde(rename = "chunk")] Chunk {
        content: String,
    },
    #[serde(rename = "done")] Done {
        message: Message,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateConversationResponse {
    #[serde(rename = "conversationId")]
    pub conversation_id: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SendMessageRequest<'a> {
    #[serde(rename = "conversationId")]
    pub conversation_id: &'a str,
    pub content: &'a str,
}
