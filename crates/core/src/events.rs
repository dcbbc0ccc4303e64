//! Outbound clock notifications

use log::warn;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Notification raised by the clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockEvent {
    /// A timer tick, carrying the freshly formatted time
    Tick(String),
    Started,
    Stopped,
}

impl ClockEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClockEvent::Tick(_) => "ClockTick",
            ClockEvent::Started => "ClockStarted",
            ClockEvent::Stopped => "ClockStopped",
        }
    }
}

/// Handle returned by [`LedClock::subscribe`](crate::LedClock::subscribe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ClockEvent)>;

/// Ordered listener registry
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Deliver to every listener in registration order. A panicking listener
    /// is logged and skipped.
    pub(crate) fn emit(&mut self, event: &ClockEvent) {
        for (id, listener) in self.entries.iter_mut() {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                warn!("{} listener {:?} panicked; ignoring", event.name(), id);
            }
        }
    }
}
