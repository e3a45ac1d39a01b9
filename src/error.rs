use serde_json::Value;
use std::time::Duration;

/// 报表服务错误
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("MONDAY_API_KEY missing")]
    MissingApiKey,

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 限流 (429 / complexity / quota)，可重试
    #[error("rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("gave up after {attempts} rate-limited attempts: {last}")]
    RetryExhausted { attempts: u32, last: String },

    #[error("Monday API error: {message}")]
    Upstream { message: String, details: Value },
}

impl ReportError {
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            details: Value::Null,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

impl From<::config::ConfigError> for ReportError {
    fn from(e: ::config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
