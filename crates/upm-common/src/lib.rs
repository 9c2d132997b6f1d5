//! UPM Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared utilities for the UPM workspace members.
//!
//! # Overview
//!
//! - **Logging**: one place to configure `tracing` output for the CLI and
//!   any other binary built on `upm-core`
//!
//! # Example
//!
//! ```no_run
//! use upm_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&LogConfig::from_env()?)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat, LogGuard, LogLevel, LogOutput};
