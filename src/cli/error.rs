//! CLI errors and their sysexits codes

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{DomainError, ErrorKind};
use crate::infrastructure::InfraError;

/// Top-level error of a `catree` invocation, printed before exiting.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        ApplicationError::from(e).into()
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Domain(domain) => match domain.kind() {
                        ErrorKind::Validation | ErrorKind::Structural => crate::exitcode::DATAERR,
                        ErrorKind::Lookup => crate::exitcode::NOINPUT,
                    },
                    ApplicationError::InvalidListing { .. } => crate::exitcode::DATAERR,
                    ApplicationError::NoSource => crate::exitcode::USAGE,
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::NOINPUT,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_validation_error_when_mapping_then_dataerr() {
        let err = CliError::from(DomainError::InvalidParent { id: 3, level: 2 });
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_missing_category_when_mapping_then_noinput() {
        let err = CliError::from(DomainError::CategoryNotFound(3));
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_missing_source_or_io_failure_when_mapping_then_usage_or_ioerr() {
        assert_eq!(
            CliError::from(ApplicationError::NoSource).exit_code(),
            crate::exitcode::USAGE
        );
        let io = InfraError::io(
            "current directory",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(CliError::from(io).exit_code(), crate::exitcode::IOERR);
        assert_eq!(
            CliError::Usage("no command".into()).exit_code(),
            crate::exitcode::USAGE
        );
    }

    #[test]
    fn given_detached_category_when_mapping_then_dataerr() {
        let err = CliError::from(DomainError::DetachedTopLevel { id: 2, parent: 1 });
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_config_error_when_mapping_then_config() {
        let err = CliError::from(ApplicationError::Config {
            message: "bad".into(),
        });
        assert_eq!(err.exit_code(), crate::exitcode::CONFIG);
    }
}
