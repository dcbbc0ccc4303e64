//! led-clock: An LED-style digital clock widget for GTK desktops
//!
//! This library provides:
//! - Configuration management for the clock application
//! - The GTK host for the clock state machine from `led-clock-core`
//! - The main window with its controls

pub mod config;
pub mod ui;

// Re-export commonly used types
pub use config::AppConfig;
pub use ui::LedClockWidget;
