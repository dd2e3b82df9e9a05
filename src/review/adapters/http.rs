//! HTTP adapter for the homework status endpoint.

use crate::config::ApiToken;
use crate::review::{
    domain::PollCursor,
    ports::{StatusSource, StatusSourceError, StatusSourceResult},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::AUTHORIZATION};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("review-notifier/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Polls the status endpoint with `GET <endpoint>?from_date=<cursor>`.
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    client: Client,
    endpoint: String,
    token: ApiToken,
}

impl HttpStatusSource {
    /// Creates an adapter with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`StatusSourceError::Transport`] when the HTTP client cannot be
    /// built (for example when no TLS backend is available).
    pub fn new(endpoint: impl Into<String>, token: ApiToken) -> StatusSourceResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(StatusSourceError::transport)?;
        Ok(Self::with_client(client, endpoint, token))
    }

    /// Creates an adapter around an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client, endpoint: impl Into<String>, token: ApiToken) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token,
        }
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self, cursor: PollCursor) -> StatusSourceResult<Value> {
        debug!(endpoint = %self.endpoint, %cursor, "requesting homework statuses");
        let response = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token.expose()))
            .query(&[("from_date", cursor.epoch_seconds())])
            .send()
            .await
            .map_err(StatusSourceError::transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_else(|err| {
                debug!(%status, error = %err, "failed to read error response body");
                String::new()
            });
            return Err(StatusSourceError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(StatusSourceError::transport)?;
        serde_json::from_slice(&bytes).map_err(StatusSourceError::decode)
    }
}
