//! Errors from the process environment around a category listing

use thiserror::Error;

use crate::application::ApplicationError;

/// Failure while wiring up a command: either the listing could not be turned
/// into a forest, or local I/O (working directory, output) failed.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    /// I/O failure while doing `context`, e.g. "current directory".
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type InfraResult<T> = Result<T, InfraError>;
