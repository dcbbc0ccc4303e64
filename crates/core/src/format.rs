//! Wall-clock time formatting

use chrono::NaiveDateTime;
use led_clock_types::TimeFormat;

/// Format a wall-clock time for display.
///
/// | format | seconds | output        |
/// |--------|---------|---------------|
/// | 24h    | yes     | `HH:MM:SS`    |
/// | 24h    | no      | `HH:MM`       |
/// | 12h    | yes     | `hh:mm:ss AM` |
/// | 12h    | no      | `hh:mm AM`    |
pub fn format_time(time: &NaiveDateTime, format: TimeFormat, show_seconds: bool) -> String {
    let pattern = match (format, show_seconds) {
        (TimeFormat::Hour24, true) => "%H:%M:%S",
        (TimeFormat::Hour24, false) => "%H:%M",
        (TimeFormat::Hour12, true) => "%I:%M:%S %p",
        (TimeFormat::Hour12, false) => "%I:%M %p",
    };
    time.format(pattern).to_string()
}
