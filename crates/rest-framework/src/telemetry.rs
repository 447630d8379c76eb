//! # Tracing Setup
//!
//! [`setup_tracing`] installs the process-wide `tracing` subscriber. Call it once, at the
//! top of `main`; libraries and tests never call it.
//!
//! Verbosity comes from `RUST_LOG`, e.g.:
//!
//! ```text
//! RUST_LOG=info                                # lifecycle: gateways started, lists loaded
//! RUST_LOG=debug                               # every request with its path and status
//! RUST_LOG=info,rest_framework::events=trace   # plus bus traffic
//! ```
//!
//! Gateways tag their events with `entity_type` and `resource`, so the module path is
//! left out of each line.

/// Initializes the compact fmt subscriber filtered by `RUST_LOG`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
