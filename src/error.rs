use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ClientConfigBuilderError;
use crate::gauth::GAuthError;

#[derive(Error, Debug)]
pub enum ChronicleError {
    #[error("ReqwestError: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// The API answered with a non-2xx status. `body` is the raw response text.
    #[error("response error {status}:\n{body}")]
    Response { status: StatusCode, body: String },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Credentials: {0}")]
    GAuth(#[from] GAuthError),
    #[error("Config: {0}")]
    Config(String),
}

impl From<ClientConfigBuilderError> for ChronicleError {
    fn from(err: ClientConfigBuilderError) -> Self {
        ChronicleError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChronicleError>;
