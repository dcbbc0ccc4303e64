//! User interface components

pub mod alerts;
pub mod glib_timer;
pub mod led_clock_widget;
pub mod main_window;

pub use glib_timer::GlibTickTimer;
pub use led_clock_widget::LedClockWidget;
pub use main_window::build_main_window;
