use std::time::SystemTimeError;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GAuthError>;

#[derive(Error, Debug)]
pub enum GAuthError {
    #[error("failed to read credentials: {0}")]
    ReadKey(String),
    #[error("no application default credentials found")]
    MissingCredentials,
    #[error("unsupported credential type: {0}")]
    UnsupportedCredential(String),
    #[error("SerdeJson: {0}")]
    SerdeJson(#[from] serde_json::Error),
    #[error("Base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("RsaKeyPair: {0}")]
    RsaKeyPair(String),
    #[error("RsaSign: {0}")]
    RsaSign(String),
    #[error("ReqwestError: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("token exchange failed {status}:\n{body}")]
    TokenExchange { status: StatusCode, body: String },
    #[error("SystemTime: {0}")]
    SystemTime(#[from] SystemTimeError),
}
