//! The host runtime: an engine wired to real capability executors.
//!
//! `dispatch` feeds one event to the engine, executes every effect request
//! it returns, and re-dispatches the responses until the engine goes quiet.
//! Every event crosses the same byte boundary a foreign-runtime shell would
//! use: encoded event in, encoded request batch out. Persistence and
//! snapshot execute synchronously in that loop; timer ticks come back
//! asynchronously through the event channel, which `pump` drains. Shells
//! call `dispatch` for user intents, `pump` once per loop iteration, and
//! `take_render` to learn whether the view is stale.

use crate::persistence::PersistenceExecutor;
use crate::snapshot::SnapshotStore;
use crate::store::WorkoutStore;
use crate::timer::Ticker;
use lift_core::codec;
use lift_core::{
    Config, EffectOp, EffectRequest, Engine, Event, Model, Result, TimerOp, ViewModel,
};
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::time::Duration;
use tracing::warn;

pub struct HostRuntime {
    engine: Engine,
    persistence: PersistenceExecutor,
    snapshot: SnapshotStore,
    ticker: Ticker,
    sender: Sender<Event>,
    inbox: Receiver<Event>,
    needs_render: bool,
}

impl HostRuntime {
    pub fn new(config: &Config) -> Result<Self> {
        let data_dir = &config.data.data_dir;
        std::fs::create_dir_all(data_dir)?;

        let (sender, inbox) = channel();
        let persistence = PersistenceExecutor::new(
            data_dir,
            Duration::from_millis(config.persistence.retry_delay_ms),
        );
        // promote anything stranded in fallback storage by a previous run
        if let Err(e) = persistence.sweep_fallback() {
            warn!("Boot-time fallback sweep failed: {}", e);
        }

        Ok(Self {
            engine: Engine::with_config(config),
            persistence,
            snapshot: SnapshotStore::new(data_dir),
            ticker: Ticker::new(
                Duration::from_secs(config.timer.tick_seconds),
                sender.clone(),
            ),
            sender,
            inbox,
            needs_render: false,
        })
    }

    /// Dispatch the boot event: snapshot recovery plus initial history load
    pub fn launch(&mut self) {
        self.dispatch(Event::Launched);
    }

    /// Feed one event and run to quiescence
    ///
    /// An event that fails to cross the codec boundary is logged and
    /// dropped; the model is left untouched.
    pub fn dispatch(&mut self, event: Event) {
        let mut queue = VecDeque::new();
        queue.push_back(event);
        while let Some(event) = queue.pop_front() {
            let requests = match self.process(event) {
                Ok(requests) => requests,
                Err(e) => {
                    warn!("Dropping event at the codec boundary: {}", e);
                    continue;
                }
            };
            for request in requests {
                if let Some(response) = self.execute(request) {
                    queue.push_back(response);
                }
            }
        }
    }

    /// One boundary crossing: encoded event in, decoded request batch out
    fn process(&mut self, event: Event) -> Result<Vec<EffectRequest>> {
        let bytes = codec::encode_event(&event)?;
        let reply = self.engine.process_event_bytes(&bytes)?;
        codec::decode_requests(&reply)
    }

    fn execute(&mut self, request: EffectRequest) -> Option<Event> {
        match request.op {
            EffectOp::Persistence { op } => Some(Event::PersistenceResponded {
                request: request.id,
                outcome: self.persistence.execute(op),
            }),
            EffectOp::Snapshot { op } => Some(Event::SnapshotResponded {
                request: request.id,
                outcome: self.snapshot.execute(op),
            }),
            EffectOp::Timer { op: TimerOp::Start } => {
                self.ticker.start(request.id);
                None
            }
            EffectOp::Timer { op: TimerOp::Stop } => Some(self.ticker.stop(request.id)),
            EffectOp::Render => {
                self.needs_render = true;
                None
            }
        }
    }

    /// Drain asynchronously delivered events (timer ticks) and re-attempt
    /// any workouts stranded in fallback storage
    pub fn pump(&mut self) {
        self.persistence.try_sweep();
        loop {
            match self.inbox.try_recv() {
                Ok(event) => self.dispatch(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    /// Whether a Render request arrived since the last call
    pub fn take_render(&mut self) -> bool {
        std::mem::take(&mut self.needs_render)
    }

    pub fn view(&self) -> ViewModel {
        self.engine.view()
    }

    pub fn model(&self) -> &Model {
        self.engine.model()
    }

    pub fn store(&self) -> &WorkoutStore {
        self.persistence.store()
    }

    /// A sender for injecting events from other threads
    pub fn event_sender(&self) -> Sender<Event> {
        self.sender.clone()
    }
}
