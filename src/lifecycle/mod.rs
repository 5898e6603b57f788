//! # Lifecycle
//!
//! Starting, wiring and stopping the collection actors.
//!
//! ## Dependency Wiring
//!
//! Actors are created first and receive their dependencies when started:
//! the Order actor's `run` gets a `ProductClient`, the other two get `()`.
//! The graph is acyclic, so closing every client stops every actor.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - closes the sender side of each channel
//! 2. **Actors detect closure** - `receiver.recv()` returns `None`
//! 3. **Await completion** - wait for every actor task
//!
//! ## Observability
//!
//! ```bash
//! RUST_LOG=info cargo run      # State changes
//! RUST_LOG=debug cargo run     # Full payloads
//! ```

pub mod store_system;
pub mod tracing;

pub use self::tracing::setup_tracing;
pub use store_system::{StoreSystem, SystemError};
