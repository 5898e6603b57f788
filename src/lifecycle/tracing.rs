//! Tracing setup.
//!
//! `RUST_LOG=info` shows state changes (created, updated, signed in),
//! `RUST_LOG=debug` adds request payloads and search hit counts.

/// Installs the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type identifies the collection
        .compact()
        .init();
}
