#![forbid(unsafe_code)]

//! Deterministic core of the Replog workout logger.
//!
//! This crate provides:
//! - Domain types (workouts, exercises, sets)
//! - The single update function and its Model
//! - Effect requests with request/response correlation
//! - ViewModel projection for shells
//! - The byte serialization boundary
//!
//! Everything here is pure state-machine code: no I/O, no clocks, no
//! threads. Hosts execute the effect requests and feed responses back in.

pub mod types;
pub mod error;
pub mod model;
pub mod event;
pub mod effect;
pub mod correlator;
pub mod update;
pub mod view;
pub mod codec;
pub mod engine;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use model::{Model, Tab};
pub use event::{Event, SetPatch};
pub use effect::{
    EffectOp, EffectRequest, PersistenceOp, PersistenceOutcome, RequestId, SnapshotOp,
    SnapshotOutcome, TimerOp, TimerOutcome,
};
pub use correlator::EffectTracker;
pub use update::update;
pub use view::{view, ViewModel};
pub use config::Config;
pub use engine::Engine;
