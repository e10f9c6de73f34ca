//! Request/response correlation for effects.
//!
//! The tracker hands out ids for outgoing effect requests and remembers
//! which ones still owe a response. A response whose id is unknown (never
//! issued, already consumed, or retired) is silently discarded; late timer
//! ticks from a stopped session die here instead of corrupting the model.
//!
//! Ids come from a monotonically increasing counter and are never reused
//! within a process lifetime, so an id uniquely names one request forever.

use crate::effect::{EffectOp, EffectRequest, RequestId};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Which capability a pending request was sent to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapabilityKind {
    Persistence,
    Snapshot,
    Timer,
}

#[derive(Clone, Copy, Debug)]
enum Pending {
    OneShot(CapabilityKind),
    /// A started timer: stays in flight across every tick until retired
    TickStream,
}

/// Allocates request ids and tracks requests awaiting a response
#[derive(Debug, Default)]
pub struct EffectTracker {
    next_id: u64,
    in_flight: HashMap<RequestId, Pending>,
}

impl EffectTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an operation in a request with a fresh id
    ///
    /// Tracked operations are recorded as in flight; Render is not tracked
    /// because no response ever comes back for it.
    pub fn request(&mut self, op: EffectOp) -> EffectRequest {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        if let Some(kind) = Self::kind_of(&op) {
            let pending = if op.opens_tick_stream() {
                Pending::TickStream
            } else {
                Pending::OneShot(kind)
            };
            self.in_flight.insert(id, pending);
        }
        debug!(id = %id, op = ?op, "effect requested");
        EffectRequest { id, op }
    }

    /// Check a response id against the in-flight table
    ///
    /// Returns true when the response belongs to a live request of the given
    /// capability. One-shot requests are consumed; a tick stream stays live
    /// so the next tick resolves too. Unknown or mismatched ids return false
    /// and the table is left untouched.
    pub fn resolve(&mut self, id: RequestId, kind: CapabilityKind) -> bool {
        match self.in_flight.get(&id) {
            Some(Pending::TickStream) if kind == CapabilityKind::Timer => true,
            Some(Pending::OneShot(pending_kind)) if *pending_kind == kind => {
                self.in_flight.remove(&id);
                true
            }
            Some(pending) => {
                warn!(id = %id, expected = ?pending, got = ?kind, "response capability mismatch, discarding");
                false
            }
            None => {
                debug!(id = %id, kind = ?kind, "response for unknown request id, discarding");
                false
            }
        }
    }

    /// Drop a request from the in-flight table without a response
    ///
    /// Used to retire a tick stream the moment a stop is issued, so ticks
    /// already in transit are discarded as unknown.
    pub fn retire(&mut self, id: RequestId) -> bool {
        self.in_flight.remove(&id).is_some()
    }

    pub fn is_in_flight(&self, id: RequestId) -> bool {
        self.in_flight.contains_key(&id)
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.len()
    }

    /// Capability a response would arrive on; None for fire-and-forget ops
    fn kind_of(op: &EffectOp) -> Option<CapabilityKind> {
        match op {
            EffectOp::Persistence { .. } => Some(CapabilityKind::Persistence),
            EffectOp::Snapshot { .. } => Some(CapabilityKind::Snapshot),
            EffectOp::Timer { .. } => Some(CapabilityKind::Timer),
            EffectOp::Render => None,
        }
    }
}
