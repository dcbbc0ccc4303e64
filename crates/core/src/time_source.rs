//! Wall-clock sources

use crate::error::{ClockError, Result};
use chrono::{Local, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::cell::Cell;

/// Source of the current wall-clock time
pub trait TimeSource {
    /// Current local wall-clock time
    fn now(&self) -> NaiveDateTime;
}

/// Zone a [`SystemClock`] reports time in
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockZone {
    Local,
    Named(Tz),
}

/// Host clock, in the local zone or a named IANA zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemClock {
    zone: ClockZone,
}

impl SystemClock {
    pub fn local() -> Self {
        Self {
            zone: ClockZone::Local,
        }
    }

    /// Resolve a timezone ID. `"Local"` (any case) or an empty string select the host zone.
    pub fn from_timezone(timezone: &str) -> Result<Self> {
        let name = timezone.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("local") {
            return Ok(Self::local());
        }
        let tz: Tz = name
            .parse()
            .map_err(|_| ClockError::UnknownTimezone(name.to_string()))?;
        Ok(Self {
            zone: ClockZone::Named(tz),
        })
    }

    pub fn zone(&self) -> ClockZone {
        self.zone
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::local()
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> NaiveDateTime {
        match self.zone {
            ClockZone::Local => Local::now().naive_local(),
            ClockZone::Named(tz) => Utc::now().with_timezone(&tz).naive_local(),
        }
    }
}

/// A clock frozen at a settable instant
#[derive(Debug, Clone)]
pub struct FixedClock {
    time: Cell<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(time: NaiveDateTime) -> Self {
        Self {
            time: Cell::new(time),
        }
    }

    pub fn set(&self, time: NaiveDateTime) {
        self.time.set(time);
    }
}

impl TimeSource for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.time.get()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::rc::Rc<T> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}
