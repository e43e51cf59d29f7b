//! Output management for CLI commands.
//!
//! Handles formatting and display for text and JSON output.

use crate::error::HeaderError;
use crate::io::exit_code::ExitCode;
use crate::io::format::{JsonResponse, OutputFormat, ResponseMeta};
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Write};

/// Writes per-file results and errors in the selected format.
pub struct OutputManager {
    format: OutputFormat,
    pretty_json: bool,
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
}

impl OutputManager {
    pub fn new(format: OutputFormat, pretty_json: bool) -> Self {
        Self {
            format,
            pretty_json,
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
        }
    }

    /// Create an output manager for testing with custom writers.
    #[cfg(test)]
    pub fn new_with_writers(
        format: OutputFormat,
        pretty_json: bool,
        stdout: Box<dyn Write>,
        stderr: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            pretty_json,
            stdout,
            stderr,
        }
    }

    fn to_json<T: Serialize>(&self, value: &T) -> io::Result<String> {
        let json = if self.pretty_json {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }

    /// Output the result for one header file.
    ///
    /// In JSON mode the data is wrapped in a success response; in text mode
    /// it is printed under a file banner using its `Display` impl.
    pub fn success<T>(
        &mut self,
        file: &str,
        data: T,
        execution_time_ms: Option<u64>,
    ) -> io::Result<ExitCode>
    where
        T: Serialize + Display,
    {
        match self.format {
            OutputFormat::Json => {
                let response = JsonResponse::success(&data)
                    .with_file(file)
                    .with_meta(ResponseMeta::new(execution_time_ms));
                let json = self.to_json(&response)?;
                writeln!(self.stdout, "{json}")?;
            }
            OutputFormat::Text => {
                writeln!(self.stdout, "// {file}")?;
                writeln!(self.stdout, "{data}")?;
            }
        }
        Ok(ExitCode::Success)
    }

    /// Output an error with suggestions.
    pub fn error(&mut self, file: Option<&str>, error: &HeaderError) -> io::Result<ExitCode> {
        match self.format {
            OutputFormat::Json => {
                let mut response = JsonResponse::from_error(error);
                if let Some(file) = file {
                    response = response.with_file(file);
                }
                let json = self.to_json(&response)?;
                writeln!(self.stderr, "{json}")?;
            }
            OutputFormat::Text => {
                writeln!(self.stderr, "Error: {error}")?;
                for suggestion in error.recovery_suggestions() {
                    writeln!(self.stderr, "  Suggestion: {suggestion}")?;
                }
            }
        }
        Ok(ExitCode::from_error(error))
    }

    /// Output informational message (text mode only).
    pub fn info(&mut self, message: &str) -> io::Result<()> {
        if matches!(self.format, OutputFormat::Text) {
            writeln!(self.stdout, "{message}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn manager(format: OutputFormat) -> (OutputManager, SharedBuffer, SharedBuffer) {
        let stdout = SharedBuffer::default();
        let stderr = SharedBuffer::default();
        let manager = OutputManager::new_with_writers(
            format,
            false,
            Box::new(stdout.clone()),
            Box::new(stderr.clone()),
        );
        (manager, stdout, stderr)
    }

    #[test]
    fn test_text_success_prints_banner() {
        let (mut manager, stdout, _) = manager(OutputFormat::Text);
        let code = manager.success("Foo.h", "class Foo", None).unwrap();
        assert_eq!(code, ExitCode::Success);
        assert_eq!(stdout.contents(), "// Foo.h\nclass Foo\n");
    }

    #[test]
    fn test_json_success_is_single_line() {
        let (mut manager, stdout, _) = manager(OutputFormat::Json);
        manager.success("Foo.h", "class Foo", Some(3)).unwrap();

        let output = stdout.contents();
        assert_eq!(output.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["file"], "Foo.h");
        assert_eq!(value["data"], "class Foo");
        assert_eq!(value["meta"]["execution_time_ms"], 3);
    }

    #[test]
    fn test_error_goes_to_stderr() {
        let (mut manager, stdout, stderr) = manager(OutputFormat::Text);
        let code = manager
            .error(Some("Empty.h"), &HeaderError::Model(ModelError::NoClass))
            .unwrap();
        assert_eq!(code, ExitCode::ModelError);
        assert!(stdout.contents().is_empty());
        assert!(stderr.contents().starts_with("Error: No class found in model"));
        assert!(stderr.contents().contains("Suggestion:"));
    }
}
