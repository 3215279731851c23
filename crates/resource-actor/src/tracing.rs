//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global `tracing` subscriber used by the actors and by
//! the HTTP layer.
//!
//! The output is compact and hides the module path (`with_target(false)`); actors add an
//! `entity_type` field instead, so a line reads
//!
//! ```text
//! INFO Created entity_type="CheeseListing" id=1 size=1
//! ```
//!
//! Levels come from `RUST_LOG` when it is set:
//!
//! ```bash
//! RUST_LOG=debug cheese-api            # payloads of every request
//! RUST_LOG=resource_actor=debug cheese-api
//! ```
//!
//! Without `RUST_LOG`, `default_directive` is used (`info`, or `debug` for `--verbose`).

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Calling it twice is harmless: the second call is ignored.
pub fn setup_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
