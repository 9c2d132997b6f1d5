//! Shared handles for the protocol steps

use crate::clock::{Clock, TokioClock};
use crate::config::MapperConfig;
use crate::error::Result;
use crate::fields::{FieldRegistry, StaticRegistry};
use crate::retry::RetryPolicy;
use crate::transport::{ReqwestTransport, Transport};
use std::sync::Arc;

/// Everything a submitter, poller or paginator needs to talk to the service
///
/// Cheap to clone; all members are shared.
#[derive(Clone)]
pub struct ApiContext {
    pub transport: Arc<dyn Transport>,
    pub clock: Arc<dyn Clock>,
    pub registry: Arc<dyn FieldRegistry>,
    pub config: Arc<MapperConfig>,
    pub retry: RetryPolicy,
}

impl ApiContext {
    /// Validate `config` and wire up the default `reqwest` transport
    pub fn new(config: MapperConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Validate `config` and use a caller-supplied transport
    pub fn with_transport(config: MapperConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            transport,
            clock: Arc::new(TokioClock),
            registry: Arc::new(StaticRegistry),
            retry: RetryPolicy::from(&config.retry),
            config: Arc::new(config),
        })
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn registry(mut self, registry: Arc<dyn FieldRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }
}

impl std::fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiContext")
            .field("config", &self.config)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
