use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("{endpoint} returned status {status}")]
    StatusError { endpoint: String, status: u16 },

    #[error("Request cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::ParseError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
