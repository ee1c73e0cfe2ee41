//! Shared types for CLI command handlers.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::{AppPaths, SettingsFile};
use crate::error::EngineError;
use crate::services::DirectoryScanner;
use crate::storage::LayoutDirectory;
use crate::Engine;

/// Process exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Invalid input or rejected operation
    ValidationError = 1,
    /// File system or persistence failure
    IoError = 2,
    /// Referenced entity does not exist
    NotFound = 3,
}

/// Error reported by a CLI command.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CliError {
    /// Exit code for the process
    pub kind: ExitCode,
    /// Human-readable message
    pub message: String,
}

impl CliError {
    /// Invalid input.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// I/O or persistence failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// Missing entity.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::NotFound,
            message: message.into(),
        }
    }

    /// Numeric process exit code.
    pub const fn exit_code(&self) -> i32 {
        self.kind as i32
    }
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        let message = err.to_string();
        match err {
            EngineError::NotFound { .. } => Self::not_found(message),
            EngineError::PersistenceFailure(_) | EngineError::ScanFailure(_) => Self::io(message),
            EngineError::DuplicateKey { .. }
            | EngineError::InvalidState(_)
            | EngineError::Validation(_) => Self::validation(message),
        }
    }
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Exit code for a finished command. Errors are printed to stderr.
pub fn exit_status(result: &CliResult<()>) -> i32 {
    match result {
        Ok(()) => ExitCode::Success as i32,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    }
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Builds an engine over the settings file and layouts directory, with every
/// stored layout registered.
pub fn open_engine(paths: &AppPaths) -> CliResult<Engine> {
    let engine = Engine::with_layout_store(
        Arc::new(SettingsFile::at(paths)),
        Arc::new(LayoutDirectory::new(paths.layouts_dir())),
    );
    engine.layouts().load_persisted()?;
    Ok(engine)
}

/// Scanner over `dir`, or over the user's desktop folder when `dir` is absent.
pub fn desktop_scanner(dir: Option<&Path>) -> CliResult<DirectoryScanner> {
    match dir {
        Some(dir) => Ok(DirectoryScanner::new([dir])),
        None => DirectoryScanner::user_desktop().ok_or_else(|| {
            CliError::validation("No desktop folder on this platform; pass a directory")
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityKind;

    #[test]
    fn test_engine_errors_map_to_exit_codes() {
        let err: CliError = EngineError::not_found(EntityKind::Layout, "x").into();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "layout 'x' not found");

        let err: CliError = EngineError::PersistenceFailure("disk".into()).into();
        assert_eq!(err.exit_code(), 2);

        let err: CliError = EngineError::Validation("bad".into()).into();
        assert_eq!(err.kind, ExitCode::ValidationError);
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(exit_status(&Ok(())), 0);
        assert_eq!(exit_status(&Err(CliError::validation("bad"))), 1);
        assert_eq!(exit_status(&Err(CliError::not_found("gone"))), 3);
    }
}
