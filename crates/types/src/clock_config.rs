//! LED clock configuration types.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Time format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TimeFormat {
    #[serde(rename = "12h")]
    #[default]
    Hour12,
    #[serde(rename = "24h")]
    Hour24,
}

impl TimeFormat {
    pub fn from_24_hour_flag(use_24_hour: bool) -> Self {
        if use_24_hour {
            TimeFormat::Hour24
        } else {
            TimeFormat::Hour12
        }
    }

    pub fn is_24_hour(self) -> bool {
        self == TimeFormat::Hour24
    }
}

fn default_led_color() -> Color {
    Color::LIME
}

fn default_true() -> bool {
    true
}

fn default_timezone() -> String {
    "Local".to_string()
}

fn default_font_family() -> String {
    "Monospace".to_string()
}

fn default_width() -> i32 {
    280
}

fn default_height() -> i32 {
    80
}

/// LED clock configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedClockConfig {
    #[serde(default = "default_led_color")]
    pub led_color: Color,
    #[serde(default)]
    pub background_color: Color,
    #[serde(default)]
    pub time_format: TimeFormat,
    #[serde(default = "default_true")]
    pub show_seconds: bool,
    /// Start ticking as soon as the widget is realized
    #[serde(default = "default_true")]
    pub auto_start: bool,
    /// Timezone ID (e.g., "America/New_York", "Europe/London", "Local")
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Preferred surface size in pixels
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
}

impl Default for LedClockConfig {
    fn default() -> Self {
        Self {
            led_color: default_led_color(),
            background_color: Color::BLACK,
            time_format: TimeFormat::Hour12,
            show_seconds: true,
            auto_start: true,
            timezone: default_timezone(),
            font_family: default_font_family(),
            width: default_width(),
            height: default_height(),
        }
    }
}
