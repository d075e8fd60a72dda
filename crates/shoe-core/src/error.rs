use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Card token errors
    #[error("Invalid rank token: {0}")]
    InvalidRank(String),

    #[error("Invalid suit token: {0}")]
    InvalidSuit(String),

    // Configuration errors
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid port number: {0}")]
    InvalidPort(String),

    // Persistence errors
    #[error("Config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
