use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstuaryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("- {status}: {url}")]
    Upstream { status: u16, url: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown request type: {0}")]
    UnknownType(String),

    #[error("Bad arguments: {0}")]
    BadArgs(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Twitch credentials not configured")]
    MissingCredentials,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, EstuaryError>;
