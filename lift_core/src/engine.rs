//! The engine: one model, one tracker, one dispatch loop.
//!
//! This is the only type a host embeds. Events go in through [`Engine::dispatch`]
//! (typed) or [`Engine::process_event_bytes`] (serialized), effect requests come
//! back out, and the current ViewModel can be pulled at any time. The engine
//! performs no I/O and spawns no threads; hosts drive it from whatever loop
//! they already have.

use crate::codec;
use crate::config::Config;
use crate::correlator::EffectTracker;
use crate::effect::EffectRequest;
use crate::error::Result;
use crate::event::Event;
use crate::model::Model;
use crate::update::update;
use crate::view::{view, ViewModel};

pub struct Engine {
    model: Model,
    tracker: EffectTracker,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            model: Model::new(),
            tracker: EffectTracker::new(),
        }
    }

    /// Build an engine with tunables taken from config
    pub fn with_config(config: &Config) -> Self {
        let mut engine = Self::new();
        engine.model.snapshot_every_ticks = config.snapshot.save_every_ticks;
        engine
    }

    /// Process one event, returning the effect requests it produced
    pub fn dispatch(&mut self, event: Event) -> Vec<EffectRequest> {
        update(event, &mut self.model, &mut self.tracker)
    }

    /// Byte-boundary variant of [`Engine::dispatch`]
    ///
    /// A malformed event fails here and leaves the model untouched.
    pub fn process_event_bytes(&mut self, bytes: &[u8]) -> Result<Vec<u8>> {
        let event = codec::decode_event(bytes)?;
        let requests = self.dispatch(event);
        codec::encode_requests(&requests)
    }

    /// Project the current ViewModel
    pub fn view(&self) -> ViewModel {
        view(&self.model)
    }

    /// Byte-boundary variant of [`Engine::view`]
    pub fn view_bytes(&self) -> Result<Vec<u8>> {
        codec::encode_view(&self.view())
    }

    /// Read-only access to the model, for hosts that log or test against it
    pub fn model(&self) -> &Model {
        &self.model
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
