use thiserror::Error;

/// havoc unified error type
#[derive(Error, Debug)]
pub enum HavocError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure reported while talking to the remote service. The message is
    /// shown to the operator as-is.
    #[error("{message}")]
    Remote { message: String },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Local file error ({path}): {message}")]
    LocalFile { path: String, message: String },

    #[error("Output error: {0}")]
    Output(String),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

pub type HavocResult<T> = Result<T, HavocError>;

impl From<reqwest::Error> for HavocError {
    fn from(err: reqwest::Error) -> Self {
        Self::Remote {
            message: err.to_string(),
        }
    }
}
