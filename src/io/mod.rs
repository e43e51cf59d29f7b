//! Input/Output handling for the CLI.
//!
//! This module provides:
//! - Header file reading with a Latin-1 fallback
//! - Unified output formatting (text, JSON)
//! - Consistent error handling and exit codes

pub mod exit_code;
pub mod format;
pub mod input;
pub mod output;

pub use exit_code::ExitCode;
pub use format::{ErrorDetails, JsonResponse, OutputFormat, ResponseMeta};
pub use input::{decode_header_bytes, read_header_source};
pub use output::OutputManager;
