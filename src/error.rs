//! Error types for the swarm simulation and report stage.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Model response contained no text")]
    EmptyResponse,

    #[error("MODEL_API_KEY not set")]
    MissingApiKey,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "python")]
impl From<Error> for pyo3::PyErr {
    fn from(err: Error) -> Self {
        match err {
            Error::Config(msg) => pyo3::exceptions::PyValueError::new_err(msg),
            other => pyo3::exceptions::PyRuntimeError::new_err(other.to_string()),
        }
    }
}
