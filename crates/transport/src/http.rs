use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::SendError;

pub const CHAT_PATH: &str = "/api/chat";
pub const NO_REPLY_FALLBACK: &str = "No response received";

/// One request/reply exchange with the chat backend. Implementations never
/// retry and never surface anything but a [`SendError`].
pub trait ChatTransport: Send + Sync {
    async fn send(&self, message: &str) -> Result<String, SendError>;
}

impl<T> ChatTransport for Arc<T>
where
    T: ChatTransport,
{
    async fn send(&self, message: &str) -> Result<String, SendError> {
        self.as_ref().send(message).await
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    reply: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    debug: bool,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let endpoint = Url::parse(&format!("{}{}", config.api_base_url, CHAT_PATH))
            .with_context(|| format!("invalid api base url {}", config.api_base_url))?;

        let client = Client::builder()
            .connect_timeout(config.connect_timeout.min(config.timeout))
            .timeout(config.timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            debug: config.debug,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn reject(&self, error: SendError, detail: &str) -> SendError {
        warn!(kind = error.kind(), "chat request failed");
        if self.debug {
            debug!(endpoint = %self.endpoint, detail = %detail, "chat request failure detail");
        }
        error
    }
}

impl ChatTransport for HttpTransport {
    async fn send(&self, message: &str) -> Result<String, SendError> {
        if self.debug {
            debug!(
                endpoint = %self.endpoint,
                chars = message.chars().count(),
                "sending chat message"
            );
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|err| self.reject(SendError::from_reqwest(&err), &err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.reject(SendError::from_status(status), &body));
        }

        let body = response
            .text()
            .await
            .map_err(|err| self.reject(SendError::from_reqwest(&err), &err.to_string()))?;

        let reply = parse_reply(&body).map_err(|err| self.reject(SendError::Generic, &err))?;

        if self.debug {
            debug!(status = status.as_u16(), chars = reply.chars().count(), "chat reply received");
        }

        Ok(reply)
    }
}

fn parse_reply(body: &str) -> Result<String, String> {
    let parsed = if body.trim().is_empty() {
        ChatResponse::default()
    } else {
        serde_json::from_str::<ChatResponse>(body).map_err(|err| err.to_string())?
    };

    Ok(parsed
        .reply
        .unwrap_or_else(|| NO_REPLY_FALLBACK.to_string()))
}
