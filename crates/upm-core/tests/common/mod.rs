//! Shared helpers for engine integration tests
//!
//! `ScriptedTransport` replays canned responses keyed by method and URL
//! fragment, and records every request it receives.

#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use upm_core::transport::Method;
use upm_core::{
    ApiContext, HttpRequest, HttpResponse, MapperConfig, RetryConfig, Transport, TransportError,
};

pub type Reply = Result<HttpResponse, TransportError>;
type Responder = Box<dyn Fn(&HttpRequest) -> Reply + Send + Sync>;

enum Replies {
    /// Replayed in order; the last one repeats forever
    Script(VecDeque<Reply>),
    Dynamic(Responder),
}

struct Route {
    method: Method,
    url_contains: String,
    /// `Some(None)` matches only requests without a cursor
    cursor: Option<Option<String>>,
    replies: Replies,
}

impl Route {
    fn matches(&self, request: &HttpRequest) -> bool {
        if request.method != self.method || !request.url.contains(&self.url_contains) {
            return false;
        }
        match &self.cursor {
            None => true,
            Some(expected) => request.param_value("cursor") == expected.as_deref(),
        }
    }

    fn reply(&mut self, request: &HttpRequest) -> Reply {
        match &mut self.replies {
            Replies::Script(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Replies::Script(queue) => queue.front().cloned().unwrap(),
            Replies::Dynamic(f) => f(request),
        }
    }
}

#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<Vec<Route>>,
    log: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, url_contains: &str, replies: Vec<Reply>) {
        assert!(!replies.is_empty(), "a route needs at least one reply");
        self.push(Route {
            method,
            url_contains: url_contains.to_string(),
            cursor: None,
            replies: Replies::Script(replies.into()),
        });
    }

    /// Route a result page by its cursor (`None` = first page)
    pub fn on_page(&self, url_contains: &str, cursor: Option<&str>, replies: Vec<Reply>) {
        assert!(!replies.is_empty(), "a route needs at least one reply");
        self.push(Route {
            method: Method::Get,
            url_contains: url_contains.to_string(),
            cursor: Some(cursor.map(str::to_string)),
            replies: Replies::Script(replies.into()),
        });
    }

    pub fn on_fn(
        &self,
        method: Method,
        url_contains: &str,
        f: impl Fn(&HttpRequest) -> Reply + Send + Sync + 'static,
    ) {
        self.push(Route {
            method,
            url_contains: url_contains.to_string(),
            cursor: None,
            replies: Replies::Dynamic(Box::new(f)),
        });
    }

    fn push(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, url_contains: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.contains(url_contains))
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.log.lock().unwrap().push(request.clone());
        let mut routes = self.routes.lock().unwrap();
        match routes.iter_mut().find(|r| r.matches(&request)) {
            Some(route) => route.reply(&request),
            None => Err(TransportError::Request(format!(
                "no scripted route for {:?} {}",
                request.method, request.url
            ))),
        }
    }
}

pub fn json(status: u16, body: Value) -> Reply {
    Ok(HttpResponse::new(status, body.to_string()))
}

pub fn status(code: u16) -> Reply {
    Ok(HttpResponse::new(code, ""))
}

pub fn job_status(token: &str) -> Reply {
    json(200, serde_json::json!({ "jobStatus": token }))
}

/// A JSON result page, optionally pointing at a next cursor
pub fn page(body: Value, next_cursor: Option<&str>) -> Reply {
    let mut response = HttpResponse::new(200, body.to_string());
    if let Some(cursor) = next_cursor {
        response = response.with_header(
            "Link",
            format!(
                "<https://rest.uniprot.org/idmapping/results/x?cursor={}&size=2>; rel=\"next\"",
                cursor
            ),
        );
    }
    Ok(response)
}

/// One-second polls, five-second deadline, fast retries
pub fn fast_config() -> MapperConfig {
    MapperConfig::default()
        .with_api_url("https://rest.uniprot.org")
        .with_poll_interval(1)
        .with_max_wait(5)
        .with_retry(RetryConfig {
            max_attempts: 3,
            base_delay_ms: 10,
            max_jitter_ms: 0,
        })
}

pub fn context(transport: &Arc<ScriptedTransport>, config: MapperConfig) -> ApiContext {
    ApiContext::with_transport(config, transport.clone()).unwrap()
}
