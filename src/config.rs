//! Process configuration loaded from environment variables.
//!
//! Three credentials are required: the status endpoint token, the Telegram
//! bot token and the destination chat identifier. Empty or whitespace-only
//! values count as missing. Loading fails before any client is built, so a
//! misconfigured process never touches the network.

use crate::review::services::PollSettings;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the status endpoint OAuth token.
pub const PRACTICUM_TOKEN_VAR: &str = "PRACTICUM_TOKEN";
/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
/// Environment variable holding the destination chat identifier.
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";
/// Environment variable overriding the status endpoint URL.
pub const PRACTICUM_ENDPOINT_VAR: &str = "PRACTICUM_ENDPOINT";
/// Environment variable overriding the Telegram Bot API root.
pub const TELEGRAM_API_URL_VAR: &str = "TELEGRAM_API_URL";
/// Environment variable overriding the delay between cycles, in seconds.
pub const RETRY_INTERVAL_VAR: &str = "RETRY_INTERVAL_SECS";
/// Environment variable enabling failure reports to the chat.
pub const REPORT_FAILURES_VAR: &str = "REPORT_FAILURES";

/// Default homework status endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
/// Default Telegram Bot API root.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
/// Default delay between cycles.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(600);

/// Errors raised while loading configuration. All of them are fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required variables are unset or blank.
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVariable(Vec<&'static str>),

    /// An optional variable carries a value that cannot be used.
    #[error("invalid value '{value}' for {variable}: {reason}")]
    InvalidValue {
        /// Variable name.
        variable: &'static str,
        /// Offending value.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Secret credential whose `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Wraps a credential value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw credential for use in request headers.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

/// Immutable notifier configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    practicum_token: ApiToken,
    telegram_token: ApiToken,
    telegram_chat_id: String,
    endpoint: String,
    telegram_api_url: String,
    retry_interval: Duration,
    report_failures: bool,
}

impl NotifierConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or an
    /// optional one is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariable`] listing every missing
    /// credential, or [`ConfigError::InvalidValue`] for a malformed optional
    /// setting.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let credentials = [PRACTICUM_TOKEN_VAR, TELEGRAM_TOKEN_VAR, TELEGRAM_CHAT_ID_VAR]
            .map(|name| (name, read(name)));
        let [
            (_, Some(practicum_token)),
            (_, Some(telegram_token)),
            (_, Some(telegram_chat_id)),
        ] = credentials.clone()
        else {
            let missing = credentials
                .into_iter()
                .filter_map(|(name, value)| value.is_none().then_some(name))
                .collect();
            return Err(ConfigError::MissingVariable(missing));
        };

        let retry_interval = read(RETRY_INTERVAL_VAR)
            .map(|value| parse_interval(&value))
            .transpose()?
            .unwrap_or(DEFAULT_RETRY_INTERVAL);
        let report_failures = read(REPORT_FAILURES_VAR)
            .map(|value| parse_flag(REPORT_FAILURES_VAR, &value))
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            practicum_token: ApiToken::new(practicum_token),
            telegram_token: ApiToken::new(telegram_token),
            telegram_chat_id: telegram_chat_id.trim().to_owned(),
            endpoint: read(PRACTICUM_ENDPOINT_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
            telegram_api_url: read(TELEGRAM_API_URL_VAR)
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_owned()),
            retry_interval,
            report_failures,
        })
    }

    /// Returns the status endpoint token.
    #[must_use]
    pub const fn practicum_token(&self) -> &ApiToken {
        &self.practicum_token
    }

    /// Returns the Telegram bot token.
    #[must_use]
    pub const fn telegram_token(&self) -> &ApiToken {
        &self.telegram_token
    }

    /// Returns the destination chat identifier.
    #[must_use]
    pub fn telegram_chat_id(&self) -> &str {
        &self.telegram_chat_id
    }

    /// Returns the status endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the Telegram Bot API root.
    #[must_use]
    pub fn telegram_api_url(&self) -> &str {
        &self.telegram_api_url
    }

    /// Returns poll loop settings derived from this configuration.
    #[must_use]
    pub const fn poll_settings(&self) -> PollSettings {
        PollSettings::new(self.retry_interval).with_failure_reports(self.report_failures)
    }
}

fn parse_interval(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(seconds) if seconds > 0 => Ok(Duration::from_secs(seconds)),
        _ => Err(ConfigError::InvalidValue {
            variable: RETRY_INTERVAL_VAR,
            value: value.to_owned(),
            reason: "expected a positive number of seconds",
        }),
    }
}

fn parse_flag(variable: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            variable,
            value: value.to_owned(),
            reason: "expected true or false",
        }),
    }
}
