use async_trait::async_trait;
use futures::StreamExt;
use log::{ debug, info };
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, ACCEPT } };
use url::Url;

use super::{ ByteStream, ChatBackend };
use crate::config::ClientConfig;
use crate::error::ChatError;
use crate::models::stream::{ CreateConversationResponse, SendMessageRequest };

const CONVERSATIONS_ROUTE: &str = "api/conversations";
const MESSAGES_ROUTE: &str = "api/messages";

pub struct HttpBackend {
    http: HttpClient,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(base_url: Url) -> Result<Self, ChatError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/event-stream"));
        let http = HttpClient::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: with_trailing_slash(base_url),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ChatError> {
        Self::new(config.server_url.clone())
    }

    fn endpoint(&self, route: &str) -> Result<Url, ChatError> {
        Ok(self.base_url.join(route)?)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn create_conversation(&self) -> Result<String, ChatError> {
        let url = self.endpoint(CONVERSATIONS_ROUTE)?;
        let resp = self.http.post(url.clone()).send().await?;
        if !resp.status().is_success() {
            return Err(ChatError::Status {
                status: resp.status(),
                url: url.to_string(),
            });
        }
        let data = resp.json::<CreateConversationResponse>().await?;
        info!("Created conversation {}", data.conversation_id);
        Ok(data.conversation_id)
    }

    async fn send_message(
        &self,
        conversation_id: &str,
        content: &str
    ) -> Result<ByteStream, ChatError> {
        let url = self.endpoint(MESSAGES_ROUTE)?;
        let req = SendMessageRequest {
            conversation_id,
            content,
        };
        debug!("POST {} ({} chars)", url, content.len());

        let resp = self.http.post(url.clone()).json(&req).send().await?;
        if !resp.status().is_success() {
            return Err(ChatError::Status {
                status: resp.status(),
                url: url.to_string(),
            });
        }

        let stream = resp.bytes_stream().map(|chunk| chunk.map_err(ChatError::from));
        Ok(Box::pin(stream))
    }
}

// `Url::join` drops the last path segment unless it ends with a slash, which
// would turn `http://host/chat` + `api/messages` into `http://host/api/messages`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_resolve_under_base_path() {
        let backend = HttpBackend::new(Url::parse("http://localhost:3000").unwrap()).unwrap();
        assert_eq!(
            backend.endpoint(MESSAGES_ROUTE).unwrap().as_str(),
            "http://localhost:3000/api/messages"
        );

        let nested = HttpBackend::new(Url::parse("https://example.org/chat").unwrap()).unwrap();
        assert_eq!(
            nested.endpoint(CONVERSATIONS_ROUTE).unwrap().as_str(),
            "https://example.org/chat/api/conversations"
        );
    }
}
