//! Error types for header modeling and synthesis
//!
//! This module provides structured error types using thiserror. Only two
//! kinds of failure are fatal for a header: upstream syntax errors and
//! model-invariant violations. Everything else is plumbing around them.

use crate::types::SourceLocation;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning header text into a syntax tree
#[derive(Error, Debug, Clone)]
pub enum ParseError {
    #[error("Failed to initialize {language} parser: {reason}")]
    ParserInit { language: String, reason: String },

    #[error("Error at line {line}:{column} in '{file}': {reason}")]
    SyntaxError {
        file: String,
        line: usize,
        column: usize,
        reason: String,
    },

    #[error("Parser produced no syntax tree for '{file}'")]
    NoTree { file: String },
}

/// Violations of the header model invariants
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("No nested classes allowed: {location}")]
    NestedClass { location: SourceLocation },

    #[error("Multiple class definitions not allowed: {location}")]
    DuplicateClass { location: SourceLocation },

    #[error("No class defined: {location}")]
    NoOpenClass { location: SourceLocation },

    #[error("No class found in model")]
    NoClass,

    #[error("Class '{name}' was opened but never closed")]
    UnclosedClass { name: String },

    #[error("Unsupported member declarator '{declarator}': {location}")]
    UnsupportedDeclarator {
        declarator: String,
        location: SourceLocation,
    },

    #[error("Span {start}..{end} does not lie on the {len}-byte source buffer")]
    InvalidSpan { start: usize, end: usize, len: usize },
}

/// Top-level error for processing one header file
#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Invalid configuration: {reason}")]
    ConfigError { reason: String },

    #[error("{0}")]
    General(String),
}

impl HeaderError {
    /// Get a stable status code for this error type.
    ///
    /// Used in JSON responses for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::Parse(ParseError::SyntaxError { .. }) => "SYNTAX_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Model(ModelError::NestedClass { .. }) => "NESTED_CLASS",
            Self::Model(ModelError::DuplicateClass { .. }) => "DUPLICATE_CLASS",
            Self::Model(ModelError::NoClass) => "NO_CLASS",
            Self::Model(ModelError::UnsupportedDeclarator { .. }) => "UNSUPPORTED_DECLARATOR",
            Self::Model(_) => "MODEL_ERROR",
            Self::ConfigError { .. } => "CONFIG_ERROR",
            Self::General(_) => "GENERAL_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::FileRead { .. } => vec![
                "Check that the file exists and you have read permissions",
                "Ensure the file is not locked by another process",
            ],
            Self::Parse(ParseError::SyntaxError { .. }) => vec![
                "Fix the reported syntax error; the header is not modeled until it parses cleanly",
                "Macros used as declaration prefixes must be defined away before parsing",
            ],
            Self::Model(ModelError::NestedClass { .. }) => {
                vec!["Move the nested class into its own header"]
            }
            Self::Model(ModelError::DuplicateClass { .. }) => {
                vec!["Split the header so that each file defines exactly one class"]
            }
            Self::Model(ModelError::NoClass) => {
                vec!["The header must define exactly one class to synthesize code"]
            }
            Self::Model(ModelError::UnsupportedDeclarator { .. }) => {
                vec!["Name the function pointer type with a typedef or using alias"]
            }
            Self::ConfigError { .. } => vec![
                "Run 'headergen init --force' to regenerate the settings file",
            ],
            _ => vec![],
        }
    }
}

/// Result type alias for parse operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type alias for model construction and synthesis
pub type ModelResult<T> = Result<T, ModelError>;

/// Result type alias for whole-file processing
pub type HeaderResult<T> = Result<T, HeaderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Position;

    #[test]
    fn test_nested_class_message_has_location() {
        let err = ModelError::NestedClass {
            location: SourceLocation::new("Widget.h", Position::new(7, 4)),
        };
        assert_eq!(err.to_string(), "No nested classes allowed: Widget.h: 7, 4");
    }

    #[test]
    fn test_status_codes() {
        let err: HeaderError = ModelError::NoClass.into();
        assert_eq!(err.status_code(), "NO_CLASS");

        let err: HeaderError = ParseError::SyntaxError {
            file: "a.h".to_string(),
            line: 3,
            column: 1,
            reason: "unexpected token".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), "SYNTAX_ERROR");
        assert!(!err.recovery_suggestions().is_empty());
    }

    #[test]
    fn test_transparent_display() {
        let err: HeaderError = ModelError::NoClass.into();
        assert_eq!(err.to_string(), "No class found in model");
    }
}
