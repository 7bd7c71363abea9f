use seospyder_client::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{0}")]
    Validation(String),

    #[error("Sign-in required: {auth_url}")]
    AuthRequired { auth_url: String },

    #[error("WordPress credentials required: {0}")]
    CredentialsRequired(String),

    #[error("{0}")]
    Empty(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl CoreError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CoreError::Client(ClientError::Cancelled))
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::ParseError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
