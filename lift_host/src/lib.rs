#![forbid(unsafe_code)]

//! Host-side capability executors for the Replog core.
//!
//! This crate provides:
//! - Durable workout storage (one JSON document per workout)
//! - The tiered save policy with fallback promotion
//! - Single-slot recovery snapshots
//! - The background timer
//! - A runtime that wires all of it to an engine
//! - CSV export of stored history
//!
//! The core never links against any of this; it only sees effect requests
//! and response events.

pub mod store;
pub mod snapshot;
pub mod persistence;
pub mod timer;
pub mod runtime;
pub mod export;

// Re-export commonly used types
pub use export::export_csv;
pub use persistence::PersistenceExecutor;
pub use runtime::HostRuntime;
pub use snapshot::SnapshotStore;
pub use store::WorkoutStore;
pub use timer::Ticker;
