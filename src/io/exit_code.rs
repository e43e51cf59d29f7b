//! Exit codes for CLI operations following Unix conventions.
//!
//! - `0`: success
//! - `1`: general error
//! - `4-7`: specific per-file failures
//! - `126-255`: reserved by shell

use crate::error::{HeaderError, ParseError};

/// Process exit codes for the `headergen` binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Every requested header was processed (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Header did not parse (code 4)
    ParseError = 4,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,

    /// Header parsed but violates a model invariant (code 7)
    ModelError = 7,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Map a `HeaderError` to the exit code scripts can branch on.
    pub fn from_error(error: &HeaderError) -> Self {
        match error {
            HeaderError::Parse(ParseError::ParserInit { .. }) => ExitCode::GeneralError,
            HeaderError::Parse(_) => ExitCode::ParseError,
            HeaderError::FileRead { .. } => ExitCode::IoError,
            HeaderError::ConfigError { .. } => ExitCode::ConfigError,
            HeaderError::Model(_) => ExitCode::ModelError,
            HeaderError::General(_) => ExitCode::GeneralError,
        }
    }

    /// Exit code for a batch: success only if every file succeeded,
    /// otherwise the code of the first failure.
    pub fn from_batch<'a, T>(results: impl IntoIterator<Item = &'a Result<T, HeaderError>>) -> Self
    where
        T: 'a,
    {
        results
            .into_iter()
            .find_map(|result| result.as_ref().err())
            .map_or(ExitCode::Success, ExitCode::from_error)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }

    /// Get a human-readable description of the exit code.
    pub fn description(&self) -> &str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::ParseError => "Parse error",
            ExitCode::IoError => "I/O error",
            ExitCode::ConfigError => "Configuration error",
            ExitCode::ModelError => "Model error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success as u8, 0);
        assert_eq!(ExitCode::GeneralError as u8, 1);
        assert_eq!(ExitCode::ParseError as u8, 4);
        assert_eq!(ExitCode::ModelError as u8, 7);
        assert_eq!(i32::from(ExitCode::IoError), 5);
    }

    #[test]
    fn test_from_error() {
        let syntax = HeaderError::Parse(ParseError::SyntaxError {
            file: "a.h".to_string(),
            line: 1,
            column: 0,
            reason: "unexpected input".to_string(),
        });
        assert_eq!(ExitCode::from_error(&syntax), ExitCode::ParseError);

        let model = HeaderError::Model(ModelError::NoClass);
        assert_eq!(ExitCode::from_error(&model), ExitCode::ModelError);

        let read = HeaderError::FileRead {
            path: PathBuf::from("missing.h"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(ExitCode::from_error(&read), ExitCode::IoError);

        let config = HeaderError::ConfigError {
            reason: "bad".to_string(),
        };
        assert_eq!(ExitCode::from_error(&config), ExitCode::ConfigError);
        assert_eq!(
            ExitCode::from_error(&HeaderError::General("x".to_string())),
            ExitCode::GeneralError
        );
    }

    #[test]
    fn test_from_batch_uses_first_failure() {
        let results: Vec<Result<(), HeaderError>> = vec![
            Ok(()),
            Err(HeaderError::Model(ModelError::NoClass)),
            Err(HeaderError::General("later".to_string())),
        ];
        assert_eq!(ExitCode::from_batch(&results), ExitCode::ModelError);

        let clean: Vec<Result<(), HeaderError>> = vec![Ok(()), Ok(())];
        assert!(ExitCode::from_batch(&clean).is_success());
    }
}
