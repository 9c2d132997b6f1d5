//! UPM Core
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Client-side engine for the UniProt REST service.
//!
//! # Overview
//!
//! - **ID mapping**: split identifiers into batches, submit one job per
//!   batch, poll until done, walk the paginated results and reconcile the
//!   identifiers the service did not map ([`orchestrator`])
//! - **Query building**: validated UniProtKB query strings from typed
//!   predicates ([`query`])
//! - **Field registry**: the static table of query and return fields and
//!   supported mapping databases ([`fields`])
//! - **Search**: paginated UniProtKB search ([`search`])
//! - **Orthologs**: accessions to OrthoDB groups and back to Swiss-Prot
//!   entries ([`orthologs`])
//!
//! HTTP goes through the [`transport::Transport`] trait; the default
//! implementation uses `reqwest`.
//!
//! # Example
//!
//! ```no_run
//! use upm_core::{ApiContext, MapperConfig, MappingOrchestrator, MappingRequest};
//!
//! # async fn example() -> upm_core::Result<()> {
//! let ctx = ApiContext::new(MapperConfig::from_env()?)?;
//! let request = MappingRequest::new("UniProtKB_AC-ID", "Ensembl", ["P30542", "Q16678"]);
//!
//! let result = MappingOrchestrator::new(ctx).run(request).await?;
//! for record in &result.results {
//!     println!("{} -> {}", record.from_id, record.to_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod clock;
pub mod config;
pub mod context;
pub mod decode;
pub mod endpoints;
pub mod error;
pub mod fields;
pub mod orchestrator;
pub mod orthologs;
pub mod paginate;
pub mod poll;
pub mod query;
pub mod retry;
pub mod search;
pub mod submit;
pub mod transport;
pub mod types;

pub use batch::{split, Batch};
pub use config::{MapperConfig, RetryConfig};
pub use context::ApiContext;
pub use error::{MapperError, Result};
pub use fields::{FieldDescriptor, FieldRegistry, FieldType, StaticRegistry};
pub use orchestrator::MappingOrchestrator;
pub use orthologs::{Ortholog, OrthologFinder, OrthologRequest, OrthologResult};
pub use query::{LogicalOp, Operator, Predicate, Query, QueryBuilder};
pub use search::{KbSearch, SearchOptions, SearchResult};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
pub use types::*;
