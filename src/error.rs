use http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Catalog API error: {status}, {body}")]
    RemoteApi { status: StatusCode, body: String },

    #[error("Spreadsheet backend error: {0}")]
    Backend(String),

    #[error("HTTP error: {0}")]
    Http(#[from] rquest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Configuration(err.to_string())
    }
}

impl Error {
    pub fn backend(context: &str, err: impl std::fmt::Display) -> Self {
        Error::Backend(format!("{}: {}", context, err))
    }
}
