//! Error types for UPM CLI
//!
//! User-facing errors with messages that say what to do next.

use thiserror::Error;
use upm_core::MapperError;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Engine error; its messages are already actionable
    #[error(transparent)]
    Mapper(#[from] MapperError),

    #[error("No identifiers given. Pass them as arguments or read them with --input FILE.")]
    NoIdentifiers,

    #[error("Unsupported database '{0}'. Run 'upm databases' to list the supported databases.")]
    UnsupportedDatabase(String),

    #[error("Invalid filter '{0}'. Expected name=value, name==value, name~value or name=low..high.")]
    InvalidFilter(String),

    #[error("Nothing to search for. Pass a query or at least one --filter.")]
    EmptySearch,

    #[error("Unknown category '{0}'. Run 'upm fields' to see every category.")]
    UnknownCategory(String),

    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    #[error("Output file '{0}' already exists. Use --overwrite to replace it.")]
    OutputExists(String),

    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}. Check your environment variables or config file.")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_filter(expr: impl Into<String>) -> Self {
        Self::InvalidFilter(expr.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_point_at_a_fix() {
        assert!(CliError::UnsupportedDatabase("Foo".into())
            .to_string()
            .contains("upm databases"));
        assert!(CliError::OutputExists("out.tsv".into())
            .to_string()
            .contains("--overwrite"));
    }

    #[test]
    fn test_mapper_errors_pass_through() {
        let err: CliError = MapperError::UnknownField("nope".into()).into();
        assert!(err.to_string().contains("upm fields"));
    }
}
