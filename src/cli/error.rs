//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
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
        CliError::Infra(InfraError::from(e))
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
                InfraError::Parse { .. } => crate::exitcode::DATAERR,
                InfraError::Serialize(_) => crate::exitcode::SOFTWARE,
                InfraError::Application(ApplicationError::Config { .. }) => crate::exitcode::CONFIG,
                InfraError::Application(ApplicationError::Domain(_)) => crate::exitcode::DATAERR,
                InfraError::Application(_) => crate::exitcode::SOFTWARE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::Usage("x".into()).exit_code(), crate::exitcode::USAGE);
        assert_eq!(
            CliError::from(DomainError::EmptyCatalog).exit_code(),
            crate::exitcode::DATAERR
        );
        assert_eq!(
            CliError::from(ApplicationError::Config { message: "bad".into() }).exit_code(),
            crate::exitcode::CONFIG
        );
    }
}
