use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("No wallet at {0}. Run 'cardwallet init' first.")]
    NotInitialized(PathBuf),

    #[error("Wallet already exists at {0}.")]
    AlreadyInitialized(PathBuf),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Ambiguous record id '{0}', use more characters")]
    AmbiguousId(String),

    #[error("Invalid record class: {0}")]
    InvalidRecordClass(String),

    #[error("Record {0} is a note and has no fields")]
    NotACard(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<roxmltree::Error> for WalletError {
    fn from(e: roxmltree::Error) -> Self {
        WalletError::Format(e.to_string())
    }
}

impl From<quick_xml::Error> for WalletError {
    fn from(e: quick_xml::Error) -> Self {
        WalletError::Format(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WalletError>;
