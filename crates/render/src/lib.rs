//! led-clock-render: Cairo rendering functions for the LED clock.

pub mod led_clock_display;
pub mod pango_text;

pub use led_clock_display::{
    font_size, glow_offsets, render_led_clock, render_to_png, GLOW_ALPHA, MIN_FONT_SIZE,
};
