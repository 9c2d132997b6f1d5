//! Job status polling
//!
//! ```text
//! PENDING ──> RUNNING ──> FINISHED
//!    │           ├──────> FAILED
//!    └───────────┴──────> NOT_FOUND
//! ```
//!
//! The poller asks for the job status, sleeps a fixed interval, and asks
//! again until the job reaches a terminal state or `max_wait` has elapsed.

use crate::context::ApiContext;
use crate::endpoints;
use crate::error::{is_transient_status, MapperError, Result};
use crate::submit::error_message;
use crate::transport::HttpRequest;
use crate::types::{Job, JobStatus};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// `jobStatus` tokens that mean the job is queued
pub const PENDING_TOKENS: &[&str] = &["NEW", "PENDING"];
pub const RUNNING_TOKENS: &[&str] = &["RUNNING"];
pub const FINISHED_TOKENS: &[&str] = &["FINISHED"];
pub const FAILED_TOKENS: &[&str] = &["ERROR", "FAILED"];
pub const NOT_FOUND_TOKENS: &[&str] = &["NOT_FOUND"];

/// Map a `jobStatus` token onto the lifecycle
pub fn parse_status_token(token: &str) -> Option<JobStatus> {
    let token = token.trim().to_ascii_uppercase();
    let token = token.as_str();
    if PENDING_TOKENS.contains(&token) {
        Some(JobStatus::Pending)
    } else if RUNNING_TOKENS.contains(&token) {
        Some(JobStatus::Running)
    } else if FINISHED_TOKENS.contains(&token) {
        Some(JobStatus::Finished)
    } else if FAILED_TOKENS.contains(&token) {
        Some(JobStatus::Failed)
    } else if NOT_FOUND_TOKENS.contains(&token) {
        Some(JobStatus::NotFound)
    } else {
        None
    }
}

pub struct Poller {
    ctx: ApiContext,
}

impl Poller {
    pub fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// One status request, no retry
    pub async fn check(&self, job_id: &str) -> Result<JobStatus> {
        let request = HttpRequest::get(endpoints::status_url(self.ctx.base_url(), job_id));
        let response = self.ctx.transport.send(request).await?;

        if response.status == 404 {
            return Ok(JobStatus::NotFound);
        }
        if !response.is_success() {
            let message = error_message(&response);
            return Err(if is_transient_status(response.status) {
                MapperError::Http {
                    status: response.status,
                    message,
                }
            } else {
                MapperError::Rejected {
                    status: response.status,
                    message,
                }
            });
        }

        let body: Value = response.json()?;
        match body.get("jobStatus").and_then(Value::as_str) {
            Some(token) => parse_status_token(token).ok_or_else(|| {
                MapperError::unexpected(format!("unknown job status '{}' for {}", token, job_id))
            }),
            // The status endpoint redirects to the results once a job is done
            None if body.get("results").is_some() || body.get("failedIds").is_some() => {
                Ok(JobStatus::Finished)
            }
            None => Err(MapperError::unexpected(format!(
                "status response for {} has no jobStatus",
                job_id
            ))),
        }
    }

    /// Poll until `job` reaches a terminal state
    ///
    /// Updates `job.status` as it goes. Returns [`MapperError::JobTimeout`]
    /// once `max_wait` has elapsed without a terminal state, and
    /// [`MapperError::Cancelled`] if `cancel` fires during a sleep.
    pub async fn wait(&self, job: &mut Job, cancel: &CancellationToken) -> Result<JobStatus> {
        let clock = self.ctx.clock.as_ref();
        let interval = self.ctx.config.poll_interval();
        let max_wait = self.ctx.config.max_wait();
        let started = clock.now();

        loop {
            let status = self
                .ctx
                .retry
                .run(clock, cancel, "poll", |_| self.check(&job.id))
                .await?;

            if status != job.status {
                debug!(job_id = %job.id, from = %job.status, to = %status, "job status changed");
                job.status = status;
            }
            if status.is_terminal() {
                info!(job_id = %job.id, status = %status, "job reached terminal state");
                return Ok(status);
            }

            let waited = clock.now().saturating_duration_since(started);
            if waited >= max_wait {
                warn!(job_id = %job.id, waited_secs = waited.as_secs(), "job timed out");
                return Err(MapperError::JobTimeout {
                    job_id: job.id.clone(),
                    waited_secs: waited.as_secs(),
                });
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(MapperError::Cancelled),
                _ = clock.sleep(interval) => {}
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tokens() {
        assert_eq!(parse_status_token("NEW"), Some(JobStatus::Pending));
        assert_eq!(parse_status_token("pending"), Some(JobStatus::Pending));
        assert_eq!(parse_status_token("RUNNING"), Some(JobStatus::Running));
        assert_eq!(parse_status_token("FINISHED"), Some(JobStatus::Finished));
        assert_eq!(parse_status_token("ERROR"), Some(JobStatus::Failed));
        assert_eq!(parse_status_token("FAILED"), Some(JobStatus::Failed));
        assert_eq!(parse_status_token("NOT_FOUND"), Some(JobStatus::NotFound));
        assert_eq!(parse_status_token("SLEEPING"), None);
    }
}
