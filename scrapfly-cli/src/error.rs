use scrapfly_client::{ConfigError, ScrapflyError};
use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Loading or saving settings failed
    #[error("Config error: {0}")]
    Config(String),

    /// Classified API failure
    #[error("{0}")]
    Api(#[from] ScrapflyError),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// One or more requests in a batch failed
    #[error("{failed} of {total} requests failed")]
    Batch { failed: usize, total: usize },

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
