//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod databases;
pub mod fields;
pub mod map;
pub mod orthologs;
pub mod search;

use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Token that fires on the first Ctrl-C
pub(crate) fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling");
            eprintln!("Interrupted, finishing up...");
            trigger.cancel();
        }
    });
    token
}
