//! Mapping orchestrator
//!
//! Drives every batch of a request through submit -> poll -> paginate ->
//! decode -> reconcile, up to `concurrency` batches at a time, and merges
//! the outcomes into one [`MappingResult`].
//!
//! Failure handling per batch:
//!
//! | Outcome                                   | Unaccounted ids | Partial |
//! |-------------------------------------------|-----------------|---------|
//! | Job finished, pages decoded               | NOT_FOUND       | no      |
//! | Job FAILED                                | UNKNOWN         | no      |
//! | Job NOT_FOUND                             | NOT_FOUND       | no      |
//! | Timeout, retries exhausted, page or decode error | UNKNOWN  | yes     |
//! | Cancelled                                 | batch dropped   | yes     |
//!
//! Construction errors and an invalid database abort the whole run. XML
//! results carry no source identifier, so a mapping run refuses that format.

use crate::batch::{self, Batch};
use crate::context::ApiContext;
use crate::error::{MapperError, Result};
use crate::paginate::Paginator;
use crate::poll::Poller;
use crate::submit::JobSubmitter;
use crate::types::{
    BatchError, FailedMapping, FailureReason, JobStatus, MappingRequest, MappingResult, Progress,
    Record, ResultFormat, ResultPage,
};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Observer invoked after each completed batch
pub type ProgressFn = Arc<dyn Fn(Progress) + Send + Sync>;

/// What one batch lifecycle produced
#[derive(Debug, Default)]
struct BatchReport {
    index: usize,
    identifiers: Vec<String>,
    records: Vec<Record>,
    failed: Vec<FailedMapping>,
    error: Option<String>,
    partial: bool,
}

impl BatchReport {
    fn new(batch: &Batch) -> Self {
        Self {
            index: batch.index(),
            identifiers: batch.identifiers().to_vec(),
            ..Default::default()
        }
    }

    fn absorb(&mut self, page: ResultPage) {
        self.records.extend(page.records);
        self.failed.extend(page.failed);
    }

    /// Give every identifier with neither a record nor a failure `reason`
    fn reconcile(&mut self, reason: FailureReason) {
        let accounted: HashSet<&str> = self
            .records
            .iter()
            .map(|r| r.from_id.as_str())
            .chain(self.failed.iter().map(|f| f.from_id.as_str()))
            .collect();

        let missing: Vec<FailedMapping> = self
            .identifiers
            .iter()
            .filter(|id| !accounted.contains(id.as_str()))
            .map(|id| FailedMapping::new(id, reason))
            .collect();
        self.failed.extend(missing);
    }
}

enum BatchOutcome {
    Done(BatchReport),
    Cancelled(usize),
    Fatal(MapperError),
}

pub struct MappingOrchestrator {
    ctx: ApiContext,
    on_progress: Option<ProgressFn>,
}

impl MappingOrchestrator {
    pub fn new(ctx: ApiContext) -> Self {
        Self {
            ctx,
            on_progress: None,
        }
    }

    pub fn on_progress(mut self, observer: impl Fn(Progress) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(observer));
        self
    }

    pub async fn run(&self, request: MappingRequest) -> Result<MappingResult> {
        self.run_with_cancel(request, CancellationToken::new()).await
    }

    /// Run `request`, stopping early if `cancel` fires
    ///
    /// A cancelled run still returns `Ok`: completed batches are kept, the
    /// rest are dropped, and the result is flagged `cancelled` and
    /// `is_partial`.
    pub async fn run_with_cancel(
        &self,
        request: MappingRequest,
        cancel: CancellationToken,
    ) -> Result<MappingResult> {
        request.validate()?;
        let max_batch_size = self.ctx.config.max_batch_size;
        if request.batch_size > max_batch_size {
            return Err(MapperError::invalid_input(format!(
                "batch_size {} exceeds the service maximum of {}",
                request.batch_size, max_batch_size
            )));
        }
        if !request.fields.is_empty() {
            self.ctx.registry.validate_return_fields(&request.fields)?;
        }
        if self.ctx.config.format == ResultFormat::Xml {
            return Err(MapperError::invalid_input(
                "XML results do not name the source identifier; use json or tsv for mapping",
            ));
        }

        let batches = batch::split(&request.identifiers, request.batch_size)?;
        let total = batches.len();
        let concurrency = self.ctx.config.concurrency.max(1);
        let started = self.ctx.clock.now();

        info!(
            from = %request.source_database,
            to = %request.target_database,
            identifiers = request.identifiers.len(),
            batches = total,
            concurrency,
            "starting mapping run"
        );

        let mut outcomes = stream::iter(batches)
            .map(|batch| self.run_batch(batch, &request, &cancel))
            .buffer_unordered(concurrency);

        let mut result = MappingResult::default();
        let mut completed = 0;

        while let Some(outcome) = outcomes.next().await {
            match outcome {
                BatchOutcome::Done(report) => {
                    completed += 1;
                    let batch_index = report.index;
                    merge(&mut result, report);

                    if let Some(observer) = &self.on_progress {
                        observer(Progress {
                            batch_index,
                            batches_completed: completed,
                            batches_total: total,
                            elapsed: self.ctx.clock.now().saturating_duration_since(started),
                        });
                    }
                }
                BatchOutcome::Cancelled(index) => {
                    info!(batch = index, "batch dropped after cancellation");
                    result.cancelled = true;
                    result.is_partial = true;
                }
                BatchOutcome::Fatal(e) => {
                    error!(error = %e, "mapping run aborted");
                    return Err(e);
                }
            }
        }

        finalize(&mut result);
        info!(
            results = result.results.len(),
            failed = result.failed_ids.len(),
            partial = result.is_partial,
            cancelled = result.cancelled,
            elapsed_ms = self.ctx.clock.now().saturating_duration_since(started).as_millis() as u64,
            "mapping run finished"
        );

        Ok(result)
    }

    async fn run_batch(
        &self,
        batch: Batch,
        request: &MappingRequest,
        cancel: &CancellationToken,
    ) -> BatchOutcome {
        if cancel.is_cancelled() {
            return BatchOutcome::Cancelled(batch.index());
        }
        let mut report = BatchReport::new(&batch);

        let submitter = JobSubmitter::new(self.ctx.clone());
        let submitted = self
            .ctx
            .retry
            .run(self.ctx.clock.as_ref(), cancel, "submit", |_| {
                submitter.submit(&batch, &request.source_database, &request.target_database)
            })
            .await;
        let mut job = match submitted {
            Ok(job) => job,
            Err(e) => return degrade(report, e),
        };

        match Poller::new(self.ctx.clone()).wait(&mut job, cancel).await {
            Ok(JobStatus::Finished) => {}
            Ok(JobStatus::Failed) => {
                warn!(batch = report.index, job_id = %job.id, "mapping job failed");
                report.error = Some(format!("job {} failed", job.id));
                report.reconcile(FailureReason::Unknown);
                return BatchOutcome::Done(report);
            }
            Ok(JobStatus::NotFound) => {
                warn!(batch = report.index, job_id = %job.id, "mapping job not found");
                report.error = Some(format!("job {} not found", job.id));
                report.reconcile(FailureReason::NotFound);
                return BatchOutcome::Done(report);
            }
            Ok(other) => {
                return degrade(
                    report,
                    MapperError::unexpected(format!("poller stopped at {}", other)),
                )
            }
            Err(e) => return degrade(report, e),
        }

        let paginator = Paginator::new(self.ctx.clone());
        let location = match paginator.locate(&job, cancel).await {
            Ok(location) => location,
            Err(e) => return degrade(report, e),
        };
        let mut pages = paginator.pages(&location, &request.fields, cancel.clone());
        while let Some(page) = pages.next_page().await {
            match page {
                Ok(page) => report.absorb(page),
                Err(e) => return degrade(report, e),
            }
        }

        report.reconcile(FailureReason::NotFound);
        info!(
            batch = report.index,
            job_id = %job.id,
            records = report.records.len(),
            failed = report.failed.len(),
            "batch completed"
        );
        BatchOutcome::Done(report)
    }
}

/// Turn a batch-level error into an outcome
fn degrade(mut report: BatchReport, e: MapperError) -> BatchOutcome {
    match e {
        MapperError::Cancelled => BatchOutcome::Cancelled(report.index),
        e if e.is_fatal() => BatchOutcome::Fatal(e),
        e => {
            warn!(batch = report.index, error = %e, "batch degraded");
            report.error = Some(e.to_string());
            report.partial = true;
            report.reconcile(FailureReason::Unknown);
            BatchOutcome::Done(report)
        }
    }
}

fn merge(result: &mut MappingResult, report: BatchReport) {
    if let Some(message) = report.error {
        result.batch_errors.push(BatchError {
            batch_index: report.index,
            message,
        });
    }
    result.is_partial |= report.partial;
    result.results.extend(report.records);
    result.failed_ids.extend(report.failed);
}

/// One failure per identifier, none for identifiers that have records
fn finalize(result: &mut MappingResult) {
    let mapped: HashSet<String> = result.results.iter().map(|r| r.from_id.clone()).collect();
    let mut seen = HashSet::new();
    result
        .failed_ids
        .retain(|f| !mapped.contains(&f.from_id) && seen.insert(f.from_id.clone()));
    result.batch_errors.sort_by_key(|e| e.batch_index);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn report(ids: &[&str]) -> BatchReport {
        BatchReport::new(&Batch::new(
            0,
            ids.iter().map(|s| s.to_string()).collect(),
        ))
    }

    #[test]
    fn test_reconcile_marks_only_missing() {
        let mut r = report(&["A", "B", "C"]);
        r.records.push(Record::new("A", "X"));
        r.failed.push(FailedMapping::new("B", FailureReason::Obsolete));
        r.reconcile(FailureReason::NotFound);

        assert_eq!(
            r.failed,
            vec![
                FailedMapping::new("B", FailureReason::Obsolete),
                FailedMapping::new("C", FailureReason::NotFound),
            ]
        );
    }

    #[test]
    fn test_degrade_marks_unknown_and_partial() {
        let mut r = report(&["A", "B"]);
        r.records.push(Record::new("A", "X"));

        let BatchOutcome::Done(r) = degrade(
            r,
            MapperError::Pagination {
                page_index: 1,
                message: "502".into(),
            },
        ) else {
            panic!("expected a degraded batch");
        };
        assert!(r.partial);
        assert_eq!(r.failed, vec![FailedMapping::new("B", FailureReason::Unknown)]);
        assert!(r.error.unwrap().contains("page 1"));
    }

    #[test]
    fn test_degrade_escalates_fatal_errors() {
        assert!(matches!(
            degrade(report(&["A"]), MapperError::InvalidDatabase("Foo".into())),
            BatchOutcome::Fatal(MapperError::InvalidDatabase(_))
        ));
        assert!(matches!(
            degrade(report(&["A"]), MapperError::Cancelled),
            BatchOutcome::Cancelled(0)
        ));
    }

    #[test]
    fn test_finalize_dedups_and_drops_mapped() {
        let mut result = MappingResult {
            results: vec![Record::new("A", "X")],
            failed_ids: vec![
                FailedMapping::new("A", FailureReason::NotFound),
                FailedMapping::new("B", FailureReason::Obsolete),
                FailedMapping::new("B", FailureReason::NotFound),
            ],
            batch_errors: vec![
                BatchError {
                    batch_index: 3,
                    message: "x".into(),
                },
                BatchError {
                    batch_index: 1,
                    message: "y".into(),
                },
            ],
            ..Default::default()
        };
        finalize(&mut result);

        assert_eq!(
            result.failed_ids,
            vec![FailedMapping::new("B", FailureReason::Obsolete)]
        );
        assert_eq!(result.batch_errors[0].batch_index, 1);
    }
}
