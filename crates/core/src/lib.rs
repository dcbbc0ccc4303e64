//! led-clock-core: Clock state machine for the led-clock widget.
//!
//! This crate contains the [`LedClock`] state machine, time formatting,
//! wall-clock sources and the tick timer seam a host event loop plugs into.
//! It has no GTK or Cairo dependencies.

mod clock;
pub mod error;
mod events;
pub mod format;
pub mod time_source;
pub mod timer;

pub use clock::{AboutInfo, ClockFrame, LedClock};
pub use error::ClockError;
pub use events::{ClockEvent, ListenerId};
pub use format::format_time;
pub use time_source::{ClockZone, FixedClock, SystemClock, TimeSource};
pub use timer::{BoxedTickTimer, ManualTimer, TickTimer, TICK_INTERVAL};

// Re-export types used in public signatures for convenience
pub use led_clock_types::{Color, LedClockConfig, TimeFormat};
