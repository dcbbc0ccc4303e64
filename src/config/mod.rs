//! Configuration management

mod settings;

pub use settings::{AppConfig, ClockOverrides, WindowConfig};
