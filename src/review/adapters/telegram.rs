//! Telegram Bot API adapter for status notifications.

use crate::config::ApiToken;
use crate::review::ports::{NotifierError, NotifierResult, StatusNotifier};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends notifications to one Telegram chat through `sendMessage`.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    token: ApiToken,
    chat_id: String,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    /// Creates a notifier with its own HTTP client.
    ///
    /// `api_base` is the Bot API root, normally `https://api.telegram.org`.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::Delivery`] when the HTTP client cannot be
    /// built.
    pub fn new(
        api_base: impl Into<String>,
        token: ApiToken,
        chat_id: impl Into<String>,
    ) -> NotifierResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(NotifierError::delivery)?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_owned(),
            token,
            chat_id: chat_id.into(),
        })
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token.expose())
    }
}

#[async_trait]
impl StatusNotifier for TelegramNotifier {
    async fn notify(&self, text: &str) -> NotifierResult<()> {
        debug!(chat_id = %self.chat_id, "sending Telegram message");
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
        };
        // The request URL embeds the bot token, so it is stripped from errors.
        let response = self
            .client
            .post(self.send_message_url())
            .json(&request)
            .send()
            .await
            .map_err(|err| NotifierError::delivery(err.without_url()))?;

        let status = response.status();
        let body = response
            .json::<BotApiResponse>()
            .await
            .map_err(|err| NotifierError::delivery(err.without_url()));

        match body {
            Ok(reply) if status.is_success() && reply.ok => Ok(()),
            Ok(reply) => Err(NotifierError::Rejected {
                status: status.as_u16(),
                description: reply.description.unwrap_or_default(),
            }),
            Err(_) if !status.is_success() => Err(NotifierError::Rejected {
                status: status.as_u16(),
                description: String::new(),
            }),
            Err(err) => Err(err),
        }
    }
}
