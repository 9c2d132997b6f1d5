//! Error types for the mapping engine
//!
//! Errors fall into three groups:
//!
//! - construction errors (bad request, bad query, bad field) which abort a
//!   run before any network traffic
//! - transient errors (transport failures, 5xx, 429) which are retried with
//!   the shared backoff policy
//! - batch-scoped errors (timeouts, pagination, decoding) which degrade one
//!   batch and leave the rest of the run intact

use crate::transport::TransportError;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, MapperError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapperError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown field '{0}'. Run 'upm fields' to list the available fields.")]
    UnknownField(String),

    #[error("Invalid range for '{field}': {message}")]
    InvalidRange { field: String, message: String },

    #[error("Invalid predicate for '{field}': {message}")]
    InvalidPredicate { field: String, message: String },

    /// The service refused the source or target database
    #[error("Invalid database: {0}. Run 'upm databases' to list the supported databases.")]
    InvalidDatabase(String),

    #[error("Job submission failed: {0}")]
    TransientSubmission(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Non-retryable 4xx that is not a database problem
    #[error("Request rejected with HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Job {job_id} did not finish within {waited_secs}s")]
    JobTimeout { job_id: String, waited_secs: u64 },

    #[error("Failed to fetch result page {page_index}: {message}")]
    Pagination { page_index: usize, message: String },

    #[error("Failed to decode result page {page_index}: {message}")]
    Decode { page_index: usize, message: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MapperError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_range(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidRange {
            field: field.into(),
            message: msg.into(),
        }
    }

    pub fn invalid_predicate(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidPredicate {
            field: field.into(),
            message: msg.into(),
        }
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::UnexpectedResponse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn decode(page_index: usize, msg: impl Into<String>) -> Self {
        Self::Decode {
            page_index,
            message: msg.into(),
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            MapperError::TransientSubmission(_) => true,
            MapperError::Transport(e) => e.is_transient(),
            MapperError::Http { status, .. } => is_transient_status(*status),
            _ => false,
        }
    }

    /// Whether the whole run must stop rather than degrade one batch
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MapperError::InvalidInput(_)
                | MapperError::UnknownField(_)
                | MapperError::InvalidRange { .. }
                | MapperError::InvalidPredicate { .. }
                | MapperError::InvalidDatabase(_)
                | MapperError::Config(_)
        )
    }
}

/// 5xx and 429 are worth another attempt
pub fn is_transient_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(MapperError::TransientSubmission("503".into()).is_transient());
        assert!(MapperError::Http {
            status: 502,
            message: "bad gateway".into()
        }
        .is_transient());
        assert!(MapperError::Http {
            status: 429,
            message: "slow down".into()
        }
        .is_transient());
        assert!(!MapperError::Http {
            status: 400,
            message: "bad".into()
        }
        .is_transient());
        assert!(MapperError::Transport(TransportError::Timeout("30s".into())).is_transient());
        assert!(!MapperError::Cancelled.is_transient());
    }

    #[test]
    fn test_fatal_classification() {
        assert!(MapperError::InvalidDatabase("Foo".into()).is_fatal());
        assert!(MapperError::UnknownField("nope".into()).is_fatal());
        assert!(!MapperError::JobTimeout {
            job_id: "abc".into(),
            waited_secs: 5
        }
        .is_fatal());
        assert!(!MapperError::Pagination {
            page_index: 1,
            message: "gone".into()
        }
        .is_fatal());
    }

    #[test]
    fn test_messages_are_actionable() {
        let msg = MapperError::UnknownField("flavour".into()).to_string();
        assert!(msg.contains("flavour"));
        assert!(msg.contains("upm fields"));
    }
}
