//! Tick timer seam
//!
//! The clock never schedules work itself. The host owns the event loop and
//! supplies a [`TickTimer`] whose firings it routes to
//! [`LedClock::handle_tick`](crate::LedClock::handle_tick).

use crate::error::{ClockError, Result};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Interval between ticks
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// A periodic timer owned by the clock
pub trait TickTimer {
    /// Activate the timer. Starting an active timer must not create a second schedule.
    fn start(&mut self) -> Result<()>;

    /// Deactivate the timer
    fn stop(&mut self) -> Result<()>;

    fn is_active(&self) -> bool;
}

/// Boxed timer for dynamic dispatch
pub type BoxedTickTimer = Box<dyn TickTimer>;

#[derive(Debug, Default)]
struct ManualTimerState {
    active: Cell<bool>,
    starts: Cell<u32>,
    stops: Cell<u32>,
    fail_next_start: Cell<bool>,
    fail_next_stop: Cell<bool>,
}

/// A timer that never fires by itself.
///
/// Clones share state, so a clone kept outside the clock can observe the
/// timer and inject failures.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    state: Rc<ManualTimerState>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful activations
    pub fn start_count(&self) -> u32 {
        self.state.starts.get()
    }

    /// Number of successful deactivations
    pub fn stop_count(&self) -> u32 {
        self.state.stops.get()
    }

    pub fn fail_next_start(&self) {
        self.state.fail_next_start.set(true);
    }

    pub fn fail_next_stop(&self) {
        self.state.fail_next_stop.set(true);
    }
}

impl TickTimer for ManualTimer {
    fn start(&mut self) -> Result<()> {
        if self.state.fail_next_start.replace(false) {
            return Err(ClockError::Timer("manual timer refused to start".to_string()));
        }
        if !self.state.active.replace(true) {
            self.state.starts.set(self.state.starts.get() + 1);
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.state.fail_next_stop.replace(false) {
            return Err(ClockError::Timer("manual timer refused to stop".to_string()));
        }
        if self.state.active.replace(false) {
            self.state.stops.set(self.state.stops.get() + 1);
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.state.active.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_timer_counts_transitions_only() {
        let mut timer = ManualTimer::new();
        let observer = timer.clone();

        timer.start().unwrap();
        timer.start().unwrap();
        assert!(observer.is_active());
        assert_eq!(observer.start_count(), 1);

        timer.stop().unwrap();
        timer.stop().unwrap();
        assert!(!observer.is_active());
        assert_eq!(observer.stop_count(), 1);
    }

    #[test]
    fn test_manual_timer_failure_is_one_shot() {
        let mut timer = ManualTimer::new();
        timer.fail_next_start();
        assert!(matches!(timer.start(), Err(ClockError::Timer(_))));
        assert!(!timer.is_active());
        assert!(timer.start().is_ok());
        assert!(timer.is_active());
    }
}
