//! Domain types shared across the mapping pipeline

use crate::batch::Batch;
use crate::error::{MapperError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Largest batch the ID-mapping service accepts in one job
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Payload format requested from the result endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResultFormat {
    #[default]
    Json,
    Tsv,
    Xml,
}

impl ResultFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ResultFormat::Json => "json",
            ResultFormat::Tsv => "tsv",
            ResultFormat::Xml => "xml",
        }
    }
}

impl std::str::FromStr for ResultFormat {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ResultFormat::Json),
            "tsv" => Ok(ResultFormat::Tsv),
            "xml" => Ok(ResultFormat::Xml),
            other => Err(MapperError::config(format!(
                "unsupported result format '{}' (expected json, tsv or xml)",
                other
            ))),
        }
    }
}

impl fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One mapping run: translate `identifiers` from one namespace to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRequest {
    pub source_database: String,
    pub target_database: String,
    pub identifiers: Vec<String>,
    pub batch_size: usize,
    /// Return fields to pull out of each record; empty means whatever the
    /// service returns by default
    #[serde(default)]
    pub fields: Vec<String>,
}

impl MappingRequest {
    pub fn new<I, S>(
        source_database: impl Into<String>,
        target_database: impl Into<String>,
        identifiers: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source_database: source_database.into(),
            target_database: target_database.into(),
            identifiers: identifiers.into_iter().map(Into::into).collect(),
            batch_size: DEFAULT_BATCH_SIZE,
            fields: Vec::new(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.identifiers.is_empty() {
            return Err(MapperError::invalid_input("no identifiers to map"));
        }
        if self.batch_size < 1 {
            return Err(MapperError::invalid_input("batch_size must be at least 1"));
        }
        if self.source_database.trim().is_empty() || self.target_database.trim().is_empty() {
            return Err(MapperError::invalid_input(
                "source and target databases are required",
            ));
        }
        Ok(())
    }
}

/// Server-side job lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Finished,
    Failed,
    NotFound,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Finished | JobStatus::Failed | JobStatus::NotFound
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Running => "RUNNING",
            JobStatus::Finished => "FINISHED",
            JobStatus::Failed => "FAILED",
            JobStatus::NotFound => "NOT_FOUND",
        };
        f.write_str(s)
    }
}

/// A submitted mapping job, owned by the lifecycle of its batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    pub batch: Batch,
    pub target_database: String,
    pub status: JobStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Value of one requested field in a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    /// Structured value taken verbatim from a JSON payload
    Json(serde_json::Value),
    /// The field was requested but the payload did not carry it
    Absent,
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Json(serde_json::Value::String(s)) => f.write_str(s),
            FieldValue::Json(v) => write!(f, "{}", v),
            FieldValue::Absent => Ok(()),
        }
    }
}

/// One successful mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub from_id: String,
    pub to_id: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(from_id: impl Into<String>, to_id: impl Into<String>) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    NotFound,
    Obsolete,
    Ambiguous,
    Unknown,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureReason::NotFound => "NOT_FOUND",
            FailureReason::Obsolete => "OBSOLETE",
            FailureReason::Ambiguous => "AMBIGUOUS",
            FailureReason::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for FailureReason {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
            "NOT_FOUND" => Ok(FailureReason::NotFound),
            "OBSOLETE" | "DELETED" | "INACTIVE" => Ok(FailureReason::Obsolete),
            "AMBIGUOUS" | "SUGGESTED" => Ok(FailureReason::Ambiguous),
            "UNKNOWN" => Ok(FailureReason::Unknown),
            other => Err(MapperError::unexpected(format!(
                "unknown failure reason '{}'",
                other
            ))),
        }
    }
}

/// An input identifier that produced no mapping
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FailedMapping {
    pub from_id: String,
    pub reason: FailureReason,
}

impl FailedMapping {
    pub fn new(from_id: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            from_id: from_id.into(),
            reason,
        }
    }
}

/// Records and failures carried by one decoded payload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedPage {
    pub records: Vec<Record>,
    pub failed: Vec<FailedMapping>,
}

/// One page of a paginated result set
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultPage {
    pub index: usize,
    pub records: Vec<Record>,
    pub failed: Vec<FailedMapping>,
    /// `None` means this was the last page
    pub next_cursor: Option<String>,
    /// Value of `x-total-results`, when the service sent it
    pub total_results: Option<u64>,
}

/// Why one batch did not complete cleanly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchError {
    pub batch_index: usize,
    pub message: String,
}

/// Aggregate outcome of a mapping run
///
/// `results` is ordered by batch completion, and within a batch by the order
/// the service returned. With `concurrency > 1` batch completion order is
/// not deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MappingResult {
    pub results: Vec<Record>,
    pub failed_ids: Vec<FailedMapping>,
    /// Some batch timed out, lost pages, or was cancelled
    pub is_partial: bool,
    pub cancelled: bool,
    pub batch_errors: Vec<BatchError>,
}

impl MappingResult {
    /// Distinct source identifiers that have at least one record
    pub fn mapped_ids(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.results
            .iter()
            .map(|r| r.from_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

/// Snapshot passed to the progress observer after each batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub batch_index: usize,
    pub batches_completed: usize,
    pub batches_total: usize,
    pub elapsed: Duration,
}
