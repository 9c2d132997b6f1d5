//! Job submission
//!
//! One `POST /idmapping/run` per batch. A single call makes a single
//! attempt; the orchestrator wraps it in the retry policy.

use crate::batch::Batch;
use crate::context::ApiContext;
use crate::endpoints;
use crate::error::{is_transient_status, MapperError, Result};
use crate::transport::{HttpRequest, HttpResponse};
use crate::types::{Job, JobStatus};
use chrono::Utc;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunResponse {
    job_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    messages: Vec<String>,
}

pub struct JobSubmitter {
    ctx: ApiContext,
}

impl JobSubmitter {
    pub fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// Submit one batch; the returned job is `Pending`
    pub async fn submit(&self, batch: &Batch, source_db: &str, target_db: &str) -> Result<Job> {
        let request = HttpRequest::post(endpoints::run_url(self.ctx.base_url()))
            .form_field("from", source_db)
            .form_field("to", target_db)
            .form_field("ids", batch.joined());

        debug!(
            batch = batch.index(),
            ids = batch.len(),
            from = source_db,
            to = target_db,
            "submitting mapping job"
        );

        let response = match self.ctx.transport.send(request).await {
            Ok(response) => response,
            Err(e) if e.is_transient() => return Err(MapperError::TransientSubmission(e.to_string())),
            Err(e) => return Err(e.into()),
        };

        if !response.is_success() {
            return Err(classify_rejection(&response));
        }

        let body: RunResponse = response.json()?;
        info!(batch = batch.index(), job_id = %body.job_id, "job submitted");

        Ok(Job {
            id: body.job_id,
            batch: batch.clone(),
            target_database: target_db.to_string(),
            status: JobStatus::Pending,
            submitted_at: Utc::now(),
        })
    }
}

/// Human-readable message from an error body
pub(crate) fn error_message(response: &HttpResponse) -> String {
    match response.json::<ErrorBody>() {
        Ok(body) if !body.messages.is_empty() => body.messages.join("; "),
        _ => {
            let text = response.text();
            let text = text.trim();
            if text.is_empty() {
                format!("HTTP {}", response.status)
            } else {
                text.chars().take(200).collect()
            }
        }
    }
}

type DatabasePatterns = std::result::Result<(Regex, Regex), regex::Error>;

fn database_patterns() -> &'static DatabasePatterns {
    static PATTERNS: OnceLock<DatabasePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        Ok((
            Regex::new(r"(?i)\b(from|to|database|db)\b")?,
            Regex::new(r"(?i)invalid|unsupported|not (a )?valid|not supported|unknown")?,
        ))
    })
}

/// Whether a 4xx message complains about the `from` / `to` database
fn mentions_invalid_database(message: &str) -> Result<bool> {
    let (target, complaint) = database_patterns()
        .as_ref()
        .map_err(|e| MapperError::unexpected(format!("invalid database pattern: {}", e)))?;
    Ok(target.is_match(message) && complaint.is_match(message))
}

fn classify_rejection(response: &HttpResponse) -> MapperError {
    let message = error_message(response);
    if is_transient_status(response.status) {
        return MapperError::TransientSubmission(format!("HTTP {}: {}", response.status, message));
    }
    if (400..500).contains(&response.status) {
        match mentions_invalid_database(&message) {
            Ok(true) => return MapperError::InvalidDatabase(message),
            Ok(false) => {}
            Err(e) => return e,
        }
    }
    MapperError::Rejected {
        status: response.status,
        message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_database_detection() {
        assert!(mentions_invalid_database("The parameter 'from' has an invalid value 'Foo'.").unwrap());
        assert!(mentions_invalid_database("Unsupported to database: Bar").unwrap());
        assert!(!mentions_invalid_database("ids: too many identifiers").unwrap());
        assert!(!mentions_invalid_database("'to' is required").unwrap());
    }

    #[test]
    fn test_classify_rejection() {
        let bad_db = HttpResponse::new(
            400,
            r#"{"url":"x","messages":["The parameter 'to' has an invalid value 'Nowhere'."]}"#,
        );
        assert!(matches!(
            classify_rejection(&bad_db),
            MapperError::InvalidDatabase(m) if m.contains("Nowhere")
        ));

        let too_many = HttpResponse::new(400, r#"{"messages":["Maximum ids exceeded"]}"#);
        assert!(matches!(
            classify_rejection(&too_many),
            MapperError::Rejected { status: 400, .. }
        ));

        let busy = HttpResponse::new(503, "");
        assert!(matches!(
            classify_rejection(&busy),
            MapperError::TransientSubmission(_)
        ));
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message(&HttpResponse::new(500, "")), "HTTP 500");
        assert_eq!(error_message(&HttpResponse::new(400, "plain text")), "plain text");
    }
}
