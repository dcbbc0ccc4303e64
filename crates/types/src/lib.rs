//! led-clock-types: Shared data types for the led-clock widget.
//!
//! This crate contains pure data types (colors, formats, configuration)
//! shared across all led-clock crates. These types have no GTK or
//! Cairo dependencies unless the `gtk` feature is enabled.

pub mod clock_config;
pub mod color;

// Re-export commonly used types at the crate root for convenience
pub use clock_config::{LedClockConfig, TimeFormat};
pub use color::{Color, ParseColorError};
