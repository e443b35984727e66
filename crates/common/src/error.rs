use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrendError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    #[error("xAI API error: {status} {body}")]
    Status { status: u16, body: String },

    #[error("xAI API error: {0}")]
    Api(String),

    #[error("Failed to decode xAI API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("xAI API response missing content")]
    EmptyResponse,

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

pub type TrendResult<T> = Result<T, TrendError>;
