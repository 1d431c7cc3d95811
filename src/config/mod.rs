use url::Url;

use crate::cli::Args;
use crate::error::ChatError;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: Url,
    pub show_banner: bool,
}

impl ClientConfig {
    pub fn from_args(args: &Args) -> Result<Self, ChatError> {
        let server_url = Url::parse(args.server_url.trim())?;
        match server_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(
                    ChatError::Config(
                        format!("Unsupported server URL scheme '{}' (expected http or https)", other)
                    )
                );
            }
        }

        Ok(Self {
            server_url,
            show_banner: !args.no_banner,
        })
    }
}
