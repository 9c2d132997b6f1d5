//! Cursor-based result pagination
//!
//! [`ResultPages`] fetches one page per call, on demand. It is consumed by
//! value and cannot be restarted: once it has returned the last page or an
//! error, it yields nothing more.

use crate::context::ApiContext;
use crate::decode::{Decoder, PayloadKind};
use crate::endpoints::{self, ResultCollection};
use crate::error::{is_transient_status, MapperError, Result};
use crate::submit::error_message;
use crate::transport::HttpRequest;
use crate::types::{Job, ResultPage};
use futures::Stream;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub struct Paginator {
    ctx: ApiContext,
}

impl Paginator {
    pub fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// Where the results of a finished job live
    ///
    /// Follows the `redirectURL` of `/idmapping/details/{jobId}`. When the
    /// lookup fails or names no location, the collection implied by the
    /// target database is used. Only cancellation is an error.
    pub async fn locate(&self, job: &Job, cancel: &CancellationToken) -> Result<String> {
        let fallback =
            || endpoints::results_url(self.ctx.base_url(), &job.target_database, &job.id);
        let url = endpoints::details_url(self.ctx.base_url(), &job.id);

        let redirect = self
            .ctx
            .retry
            .run(self.ctx.clock.as_ref(), cancel, "details", |_| {
                self.fetch_redirect(url.clone())
            })
            .await;

        match redirect {
            Ok(Some(location)) => {
                debug!(job_id = %job.id, %location, "results location from job details");
                Ok(location)
            }
            Ok(None) => Ok(fallback()),
            Err(MapperError::Cancelled) => Err(MapperError::Cancelled),
            Err(e) => {
                warn!(
                    job_id = %job.id,
                    error = %e,
                    "job details unavailable, falling back to the target collection"
                );
                Ok(fallback())
            }
        }
    }

    async fn fetch_redirect(&self, url: String) -> Result<Option<String>> {
        let response = self.ctx.transport.send(HttpRequest::get(url)).await?;
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
        Ok(body
            .get("redirectURL")
            .and_then(Value::as_str)
            .and_then(|redirect| endpoints::rebase_results_url(self.ctx.base_url(), redirect)))
    }

    /// Pages of a finished mapping job, starting at `location`
    pub fn pages(
        &self,
        location: &str,
        fields: &[String],
        cancel: CancellationToken,
    ) -> ResultPages {
        let fields = if ResultCollection::for_results_url(location).accepts_fields() {
            fields.to_vec()
        } else {
            Vec::new()
        };
        let mut request = self.base_request(location.to_string());
        if !fields.is_empty() {
            request = request.param("fields", fields.join(","));
        }

        let decoder = Decoder::new(
            PayloadKind::Mapping,
            self.ctx.config.format,
            fields,
            self.ctx.registry.clone(),
        );
        ResultPages::new(self.ctx.clone(), request, decoder, cancel)
    }

    /// First request shared by every paginated endpoint
    pub(crate) fn base_request(&self, url: String) -> HttpRequest {
        let config = &self.ctx.config;
        HttpRequest::get(url)
            .param("format", config.format.as_str())
            .param("size", config.page_size.to_string())
            .param("compressed", config.compressed.to_string())
    }
}

/// Lazy, finite, non-restartable sequence of result pages
pub struct ResultPages {
    ctx: ApiContext,
    next_request: Option<HttpRequest>,
    decoder: Decoder,
    cancel: CancellationToken,
    index: usize,
}

impl ResultPages {
    pub(crate) fn new(
        ctx: ApiContext,
        first_request: HttpRequest,
        decoder: Decoder,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            ctx,
            next_request: Some(first_request),
            decoder,
            cancel,
            index: 0,
        }
    }

    /// Fetch and decode the next page, or `None` once exhausted
    ///
    /// Transient failures are retried; when retries run out the error is
    /// reported as [`MapperError::Pagination`] and the sequence ends.
    pub async fn next_page(&mut self) -> Option<Result<ResultPage>> {
        let request = self.next_request.take()?;
        let page_index = self.index;

        let outcome = self
            .ctx
            .retry
            .run(self.ctx.clock.as_ref(), &self.cancel, "page", |_| {
                self.fetch(request.clone(), page_index)
            })
            .await;

        let response = match outcome {
            Ok(response) => response,
            Err(e @ (MapperError::Cancelled | MapperError::Pagination { .. })) => {
                return Some(Err(e))
            }
            Err(e) => {
                warn!(page_index, error = %e, "giving up on result page");
                return Some(Err(MapperError::Pagination {
                    page_index,
                    message: e.to_string(),
                }));
            }
        };

        let decoded = match self.decoder.decode(
            &response.body,
            response.header("content-encoding"),
            page_index,
        ) {
            Ok(decoded) => decoded,
            Err(e) => return Some(Err(e)),
        };

        let next_cursor = response.header("link").and_then(endpoints::next_cursor);
        let total_results = response
            .header("x-total-results")
            .and_then(|v| v.trim().parse().ok());

        debug!(
            page_index,
            records = decoded.records.len(),
            failed = decoded.failed.len(),
            has_next = next_cursor.is_some(),
            "result page decoded"
        );

        if let Some(cursor) = &next_cursor {
            self.next_request = Some(with_cursor(&request, cursor));
        }
        self.index += 1;

        Some(Ok(ResultPage {
            index: page_index,
            records: decoded.records,
            failed: decoded.failed,
            next_cursor,
            total_results,
        }))
    }

    async fn fetch(
        &self,
        request: HttpRequest,
        page_index: usize,
    ) -> Result<crate::transport::HttpResponse> {
        let response = self.ctx.transport.send(request).await?;
        if response.is_success() {
            return Ok(response);
        }

        let message = error_message(&response);
        if is_transient_status(response.status) {
            Err(MapperError::Http {
                status: response.status,
                message,
            })
        } else {
            Err(MapperError::Pagination {
                page_index,
                message: format!("HTTP {}: {}", response.status, message),
            })
        }
    }

    /// Adapt to a `futures::Stream` of pages
    pub fn into_stream(self) -> impl Stream<Item = Result<ResultPage>> {
        futures::stream::unfold(self, |mut pages| async move {
            let item = pages.next_page().await?;
            Some((item, pages))
        })
    }
}

fn with_cursor(request: &HttpRequest, cursor: &str) -> HttpRequest {
    let mut next = request.clone();
    next.params.retain(|(k, _)| k != "cursor");
    next.param("cursor", cursor)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_with_cursor_replaces_previous() {
        let first = HttpRequest::get("https://x.org/r").param("size", "2");
        let second = with_cursor(&first, "c1");
        let third = with_cursor(&second, "c2");

        assert_eq!(second.param_value("cursor"), Some("c1"));
        assert_eq!(third.param_value("cursor"), Some("c2"));
        assert_eq!(third.params.iter().filter(|(k, _)| k == "cursor").count(), 1);
        assert_eq!(third.param_value("size"), Some("2"));
    }
}
