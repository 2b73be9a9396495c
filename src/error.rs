use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlPipeError {
    #[error("{0}")]
    Config(String),

    #[error("Unsupported triggering event: {0}")]
    UnsupportedEvent(String),

    #[error("API request [{method}] {path} failed with code {status}")]
    Request {
        method: reqwest::Method,
        path: String,
        status: u16,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GlPipeError>;
