//! Recurring tick source for the workout clock.
//!
//! A started timer is one background thread pushing tick events into the
//! host's event channel until told to stop. Ticks carry the request id of
//! the start that created them; once the core retires that id, stragglers
//! still in the channel are discarded on arrival, so stopping does not need
//! to drain anything.

use lift_core::{Event, RequestId, TimerOutcome};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Host-side timer capability; at most one live tick stream
pub struct Ticker {
    interval: Duration,
    sender: Sender<Event>,
    live: Option<LiveTimer>,
}

struct LiveTimer {
    request: RequestId,
    stop: Arc<AtomicBool>,
}

impl Ticker {
    pub fn new(interval: Duration, sender: Sender<Event>) -> Self {
        Self {
            interval,
            sender,
            live: None,
        }
    }

    /// Begin a tick stream for the given request id
    ///
    /// A still-live previous stream is halted first.
    pub fn start(&mut self, request: RequestId) {
        self.halt_live();

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let sender = self.sender.clone();
        let interval = self.interval;
        thread::spawn(move || loop {
            thread::sleep(interval);
            if thread_stop.load(Ordering::Relaxed) {
                break;
            }
            let tick = Event::TimerResponded {
                request,
                outcome: TimerOutcome::Tick,
            };
            if sender.send(tick).is_err() {
                // receiver gone, host is shutting down
                break;
            }
        });

        debug!(id = %request, "timer started");
        self.live = Some(LiveTimer { request, stop });
    }

    /// Halt the live stream and acknowledge the stop request
    pub fn stop(&mut self, request: RequestId) -> Event {
        self.halt_live();
        Event::TimerResponded {
            request,
            outcome: TimerOutcome::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.live.is_some()
    }

    fn halt_live(&mut self) {
        if let Some(live) = self.live.take() {
            live.stop.store(true, Ordering::Relaxed);
            debug!(id = %live.request, "tick stream halted");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.halt_live();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    const TICK: Duration = Duration::from_millis(5);

    fn drain(receiver: &std::sync::mpsc::Receiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_ticks_carry_the_stream_id() {
        let (sender, receiver) = channel();
        let mut ticker = Ticker::new(TICK, sender);
        ticker.start(RequestId(7));

        thread::sleep(TICK * 20);
        let events = drain(&receiver);
        assert!(!events.is_empty());
        for event in &events {
            assert_eq!(
                *event,
                Event::TimerResponded {
                    request: RequestId(7),
                    outcome: TimerOutcome::Tick,
                }
            );
        }
        ticker.stop(RequestId(8));
    }

    #[test]
    fn test_stop_halts_the_stream() {
        let (sender, receiver) = channel();
        let mut ticker = Ticker::new(TICK, sender);
        ticker.start(RequestId(1));
        thread::sleep(TICK * 10);

        let ack = ticker.stop(RequestId(2));
        assert_eq!(
            ack,
            Event::TimerResponded {
                request: RequestId(2),
                outcome: TimerOutcome::Stopped,
            }
        );
        assert!(!ticker.is_running());

        // let any in-flight tick land, then confirm silence
        thread::sleep(TICK * 2);
        drain(&receiver);
        thread::sleep(TICK * 5);
        assert!(drain(&receiver).is_empty());
    }

    #[test]
    fn test_restart_replaces_the_stream() {
        let (sender, receiver) = channel();
        let mut ticker = Ticker::new(TICK, sender);
        ticker.start(RequestId(1));
        ticker.start(RequestId(2));

        thread::sleep(TICK * 20);
        let events = drain(&receiver);
        assert!(events.iter().any(|e| matches!(
            e,
            Event::TimerResponded {
                request: RequestId(2),
                ..
            }
        )));
        ticker.stop(RequestId(3));
    }
}
