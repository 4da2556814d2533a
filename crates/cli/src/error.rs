//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// A command-line override produced an invalid configuration
    #[error("Invalid override: {0}")]
    InvalidOverride(#[source] contracts::ContractError),

    /// HTTP adapter failure
    #[error(transparent)]
    Server(#[from] http_api::ServerError),

    /// File adapter failure
    #[error(transparent)]
    Dispatcher(#[from] dispatcher::DispatcherError),

    /// A background task panicked or was cancelled
    #[error("{task} task failed: {message}")]
    TaskFailed { task: &'static str, message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn task_failed(task: &'static str, message: impl ToString) -> Self {
        Self::TaskFailed {
            task,
            message: message.to_string(),
        }
    }
}
