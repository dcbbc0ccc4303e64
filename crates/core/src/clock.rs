//! LED clock state machine
//!
//! Owns the display configuration, the derived time text and the tick timer.
//! Every mutator recomputes what it affects before returning, so a redraw
//! requested by a property change never lags behind a pending tick.

use crate::error::Result;
use crate::events::{ClockEvent, ListenerId, Listeners};
use crate::format::format_time;
use crate::time_source::{SystemClock, TimeSource};
use crate::timer::BoxedTickTimer;
use led_clock_types::{Color, LedClockConfig, TimeFormat};
use log::{debug, info, trace, warn};

/// Everything the renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ClockFrame {
    pub text: String,
    pub led_color: Color,
    pub background_color: Color,
    pub font_family: String,
}

/// Name, version and description of the control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AboutInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl AboutInfo {
    pub fn current() -> Self {
        Self {
            name: "LED Clock".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "LED-style digital clock control.".to_string(),
        }
    }

    pub fn to_message(&self) -> String {
        format!("{}\nVersion: {}\n\n{}", self.name, self.version, self.description)
    }
}

/// LED-style digital clock
pub struct LedClock {
    led_color: Color,
    background_color: Color,
    surface_color: Color,
    time_format: TimeFormat,
    show_seconds: bool,
    /// Whether the next realize starts the timer; teardown records the running state here
    start_on_realize: bool,
    font_family: String,
    is_running: bool,
    current_time: String,
    timer: Option<BoxedTickTimer>,
    time_source: Box<dyn TimeSource>,
    listeners: Listeners,
    redraw_handler: Option<Box<dyn Fn()>>,
    dirty: bool,
}

impl LedClock {
    /// Create a clock reading the host clock
    pub fn new(config: &LedClockConfig) -> Self {
        Self::with_time_source(config, Box::new(SystemClock::local()))
    }

    /// Create a clock reading time from `time_source`.
    ///
    /// No timer exists and no time is computed until [`realize`](Self::realize).
    pub fn with_time_source(config: &LedClockConfig, time_source: Box<dyn TimeSource>) -> Self {
        Self {
            led_color: config.led_color,
            background_color: config.background_color,
            surface_color: config.background_color,
            time_format: config.time_format,
            show_seconds: config.show_seconds,
            start_on_realize: config.auto_start,
            font_family: config.font_family.clone(),
            is_running: false,
            current_time: String::new(),
            timer: None,
            time_source,
            listeners: Listeners::default(),
            redraw_handler: None,
            dirty: false,
        }
    }

    /// Attach the tick timer once the host surface exists.
    ///
    /// Computes the first time text and, when auto-start is configured,
    /// activates the timer without raising [`ClockEvent::Started`]. Calls
    /// after the first are no-ops.
    ///
    /// After a teardown, a new realize resumes the running state the clock
    /// had when it was torn down. The timer is kept even if auto-start
    /// fails, so a later [`start`](Self::start) can retry.
    pub fn realize(&mut self, mut timer: BoxedTickTimer) -> Result<()> {
        if self.timer.is_some() {
            debug!("LED clock already realized");
            return Ok(());
        }

        self.update_time();
        self.request_redraw();

        let started = if self.start_on_realize {
            timer.start()
        } else {
            Ok(())
        };
        self.is_running = started.is_ok() && timer.is_active();
        self.timer = Some(timer);
        started?;
        info!("LED clock realized (running: {})", self.is_running);
        Ok(())
    }

    pub fn is_realized(&self) -> bool {
        self.timer.is_some()
    }

    /// Start ticking. No-op when already running or not yet realized.
    pub fn start(&mut self) -> Result<()> {
        let Some(timer) = self.timer.as_mut() else {
            debug!("start ignored: clock not realized");
            return Ok(());
        };
        if self.is_running {
            return Ok(());
        }

        timer.start()?;
        self.is_running = true;
        self.update_time();
        self.request_redraw();
        info!("LED clock started");
        self.listeners.emit(&ClockEvent::Started);
        Ok(())
    }

    /// Stop ticking. No-op when not running.
    pub fn stop(&mut self) -> Result<()> {
        let Some(timer) = self.timer.as_mut() else {
            return Ok(());
        };
        if !self.is_running {
            return Ok(());
        }

        timer.stop()?;
        self.is_running = false;
        info!("LED clock stopped");
        self.listeners.emit(&ClockEvent::Stopped);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Property form of [`start`](Self::start) / [`stop`](Self::stop)
    pub fn set_running(&mut self, running: bool) -> Result<()> {
        if running {
            self.start()
        } else {
            self.stop()
        }
    }

    /// Timer callback: recompute, redraw, and raise [`ClockEvent::Tick`].
    ///
    /// Only timer backends should call this. Ignored while stopped.
    pub fn handle_tick(&mut self) {
        if !self.is_running {
            trace!("tick ignored: clock stopped");
            return;
        }
        self.update_time();
        self.request_redraw();
        trace!("tick {}", self.current_time);
        let event = ClockEvent::Tick(self.current_time.clone());
        self.listeners.emit(&event);
    }

    /// Stop and release the timer. Raises no event.
    pub fn teardown(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            if timer.is_active() {
                if let Err(e) = timer.stop() {
                    warn!("Failed to stop tick timer during teardown: {}", e);
                }
            }
            self.start_on_realize = self.is_running;
            self.is_running = false;
            info!("LED clock torn down");
        }
    }

    /// Formatted time as of the last recompute; empty before the first one
    pub fn current_time(&self) -> &str {
        &self.current_time
    }

    pub fn led_color(&self) -> Color {
        self.led_color
    }

    pub fn set_led_color(&mut self, color: Color) {
        self.led_color = color;
        self.request_redraw();
    }

    pub fn led_color_packed(&self) -> i32 {
        self.led_color.to_packed()
    }

    pub fn set_led_color_packed(&mut self, value: i32) {
        self.set_led_color(Color::from_packed(value));
    }

    pub fn set_led_color_rgb(&mut self, red: i32, green: i32, blue: i32) {
        self.set_led_color(Color::from_rgb_clamped(red, green, blue));
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    /// Also updates the host surface fill
    pub fn set_background_color(&mut self, color: Color) {
        self.background_color = color;
        self.surface_color = color;
        self.request_redraw();
    }

    pub fn background_color_packed(&self) -> i32 {
        self.background_color.to_packed()
    }

    pub fn set_background_color_packed(&mut self, value: i32) {
        self.set_background_color(Color::from_packed(value));
    }

    pub fn set_background_color_rgb(&mut self, red: i32, green: i32, blue: i32) {
        self.set_background_color(Color::from_rgb_clamped(red, green, blue));
    }

    /// Fill color of the hosting surface
    pub fn surface_color(&self) -> Color {
        self.surface_color
    }

    pub fn use_24_hour_format(&self) -> bool {
        self.time_format.is_24_hour()
    }

    pub fn set_use_24_hour_format(&mut self, value: bool) {
        self.time_format = TimeFormat::from_24_hour_flag(value);
        self.update_time();
        self.request_redraw();
    }

    pub fn time_format(&self) -> TimeFormat {
        self.time_format
    }

    pub fn show_seconds(&self) -> bool {
        self.show_seconds
    }

    pub fn set_show_seconds(&mut self, value: bool) {
        self.show_seconds = value;
        self.update_time();
        self.request_redraw();
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Replace the time source, recomputing if time has been shown already
    pub fn set_time_source(&mut self, time_source: Box<dyn TimeSource>) {
        self.time_source = time_source;
        if self.is_realized() {
            self.update_time();
            self.request_redraw();
        }
    }

    pub fn about(&self) -> AboutInfo {
        AboutInfo::current()
    }

    /// Register a listener for clock events; delivered in registration order
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ClockEvent) + 'static,
    {
        self.listeners.add(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Called on every redraw request, in addition to setting the dirty flag
    pub fn set_redraw_handler<F>(&mut self, handler: F)
    where
        F: Fn() + 'static,
    {
        self.redraw_handler = Some(Box::new(handler));
    }

    /// Returns whether a redraw was requested since the last call
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Snapshot for rendering
    pub fn frame(&self) -> ClockFrame {
        ClockFrame {
            text: self.current_time.clone(),
            led_color: self.led_color,
            background_color: self.background_color,
            font_family: self.font_family.clone(),
        }
    }

    /// Current settings in configuration form
    pub fn to_config(&self, base: &LedClockConfig) -> LedClockConfig {
        LedClockConfig {
            led_color: self.led_color,
            background_color: self.background_color,
            time_format: self.time_format,
            show_seconds: self.show_seconds,
            ..base.clone()
        }
    }

    fn update_time(&mut self) {
        let now = self.time_source.now();
        self.current_time = format_time(&now, self.time_format, self.show_seconds);
    }

    fn request_redraw(&mut self) {
        self.dirty = true;
        if let Some(handler) = &self.redraw_handler {
            handler();
        }
    }
}

impl Drop for LedClock {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClockError;
    use crate::time_source::FixedClock;
    use crate::timer::{ManualTimer, TickTimer};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn clock_at(time: NaiveDateTime) -> (LedClock, Rc<FixedClock>) {
        let source = Rc::new(FixedClock::new(time));
        let clock = LedClock::with_time_source(&LedClockConfig::default(), Box::new(source.clone()));
        (clock, source)
    }

    fn record(clock: &mut LedClock) -> Rc<RefCell<Vec<ClockEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        clock.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        events
    }

    #[test]
    fn test_current_time_empty_before_realize() {
        let (clock, _) = clock_at(at(14, 7, 9));
        assert_eq!(clock.current_time(), "");
        assert!(!clock.is_running());
        assert!(!clock.is_realized());
    }

    #[test]
    fn test_start_before_realize_is_noop() {
        let (mut clock, _) = clock_at(at(14, 7, 9));
        let events = record(&mut clock);
        clock.start().unwrap();
        assert!(!clock.is_running());
        assert!(events.borrow().is_empty());
        assert_eq!(clock.current_time(), "");
    }

    #[test]
    fn test_realize_auto_starts_silently() {
        let (mut clock, _) = clock_at(at(14, 7, 9));
        let events = record(&mut clock);
        let timer = ManualTimer::new();

        clock.realize(Box::new(timer.clone())).unwrap();

        assert!(clock.is_running());
        assert!(timer.is_active());
        assert_eq!(clock.current_time(), "02:07:09 PM");
        assert!(clock.take_redraw_request());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_realize_twice_keeps_first_timer() {
        let (mut clock, _) = clock_at(at(14, 7, 9));
        let first = ManualTimer::new();
        let second = ManualTimer::new();
        clock.realize(Box::new(first.clone())).unwrap();
        clock.realize(Box::new(second.clone())).unwrap();
        assert_eq!(first.start_count(), 1);
        assert_eq!(second.start_count(), 0);
    }

    #[test]
    fn test_realize_without_auto_start() {
        let config = LedClockConfig {
            auto_start: false,
            ..LedClockConfig::default()
        };
        let mut clock =
            LedClock::with_time_source(&config, Box::new(FixedClock::new(at(8, 0, 0))));
        let timer = ManualTimer::new();
        clock.realize(Box::new(timer.clone())).unwrap();
        assert!(clock.is_realized());
        assert!(!clock.is_running());
        assert!(!timer.is_active());
        assert_eq!(clock.current_time(), "08:00:00 AM");
    }

    #[test]
    fn test_start_then_stop_emits_started_then_stopped() {
        let config = LedClockConfig {
            auto_start: false,
            ..LedClockConfig::default()
        };
        let mut clock =
            LedClock::with_time_source(&config, Box::new(FixedClock::new(at(8, 0, 0))));
        clock.realize(Box::new(ManualTimer::new())).unwrap();
        let events = record(&mut clock);

        clock.start().unwrap();
        clock.stop().unwrap();

        assert!(!clock.is_running());
        assert_eq!(*events.borrow(), vec![ClockEvent::Started, ClockEvent::Stopped]);
    }

    #[test]
    fn test_start_when_running_is_noop() {
        let (mut clock, _) = clock_at(at(8, 0, 0));
        let timer = ManualTimer::new();
        clock.realize(Box::new(timer.clone())).unwrap();
        let events = record(&mut clock);

        clock.start().unwrap();
        clock.set_running(true).unwrap();

        assert!(events.borrow().is_empty());
        assert_eq!(timer.start_count(), 1);
    }

    #[test]
    fn test_stop_when_stopped_is_noop() {
        let (mut clock, _) = clock_at(at(8, 0, 0));
        clock.realize(Box::new(ManualTimer::new())).unwrap();
        let events = record(&mut clock);

        clock.set_running(false).unwrap();
        clock.stop().unwrap();

        assert_eq!(*events.borrow(), vec![ClockEvent::Stopped]);
    }

    #[test]
    fn test_tick_recomputes_and_emits() {
        let (mut clock, source) = clock_at(at(23, 59, 58));
        clock.set_use_24_hour_format(true);
        clock.realize(Box::new(ManualTimer::new())).unwrap();
        let events = record(&mut clock);
        clock.take_redraw_request();

        source.set(at(23, 59, 59));
        clock.handle_tick();

        assert_eq!(clock.current_time(), "23:59:59");
        assert!(clock.take_redraw_request());
        assert_eq!(*events.borrow(), vec![ClockEvent::Tick("23:59:59".to_string())]);
    }

    #[test]
    fn test_tick_while_stopped_is_ignored() {
        let (mut clock, source) = clock_at(at(10, 0, 0));
        clock.realize(Box::new(ManualTimer::new())).unwrap();
        clock.stop().unwrap();
        let events = record(&mut clock);

        source.set(at(10, 0, 1));
        clock.handle_tick();

        assert_eq!(clock.current_time(), "10:00:00 AM");
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_flag_changes_recompute_immediately() {
        let (mut clock, source) = clock_at(at(14, 7, 9));
        clock.realize(Box::new(ManualTimer::new())).unwrap();
        clock.stop().unwrap();
        source.set(at(15, 30, 45));

        clock.set_show_seconds(false);
        assert_eq!(clock.current_time(), "03:30 PM");

        clock.set_use_24_hour_format(true);
        assert_eq!(clock.current_time(), "15:30");
        assert!(clock.use_24_hour_format());

        clock.set_show_seconds(true);
        assert_eq!(clock.current_time(), "15:30:45");
    }

    #[test]
    fn test_color_setters() {
        let (mut clock, _) = clock_at(at(0, 0, 0));
        clock.set_led_color_rgb(-10, 300, 128);
        assert_eq!(clock.led_color(), Color::new(0, 255, 128));
        assert!(clock.take_redraw_request());

        clock.set_background_color_packed(0x0000FF);
        assert_eq!(clock.background_color(), Color::new(255, 0, 0));
        assert_eq!(clock.surface_color(), Color::new(255, 0, 0));
        assert_eq!(clock.background_color_packed(), 0x0000FF);

        clock.set_led_color_packed(0x804020);
        assert_eq!(clock.led_color_packed(), 0x804020);

        clock.set_background_color_rgb(1, 2, 3);
        assert_eq!(clock.surface_color(), Color::new(1, 2, 3));
    }

    #[test]
    fn test_redraw_handler_invoked() {
        let (mut clock, _) = clock_at(at(0, 0, 0));
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        clock.set_redraw_handler(move || counter.set(counter.get() + 1));

        clock.set_led_color(Color::LIME);
        clock.set_show_seconds(false);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_failed_start_keeps_state() {
        let config = LedClockConfig {
            auto_start: false,
            ..LedClockConfig::default()
        };
        let mut clock =
            LedClock::with_time_source(&config, Box::new(FixedClock::new(at(8, 0, 0))));
        let timer = ManualTimer::new();
        clock.realize(Box::new(timer.clone())).unwrap();
        let events = record(&mut clock);

        timer.fail_next_start();
        assert!(matches!(clock.start(), Err(ClockError::Timer(_))));
        assert!(!clock.is_running());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_failed_stop_keeps_running() {
        let (mut clock, _) = clock_at(at(8, 0, 0));
        let timer = ManualTimer::new();
        clock.realize(Box::new(timer.clone())).unwrap();

        timer.fail_next_stop();
        assert!(clock.stop().is_err());
        assert!(clock.is_running());
        assert!(timer.is_active());
    }

    #[test]
    fn test_start_retries_after_failed_auto_start() {
        let (mut clock, _) = clock_at(at(8, 0, 0));
        let events = record(&mut clock);
        let timer = ManualTimer::new();
        timer.fail_next_start();

        assert!(matches!(
            clock.realize(Box::new(timer.clone())),
            Err(ClockError::Timer(_))
        ));
        assert!(clock.is_realized());
        assert!(!clock.is_running());
        assert_eq!(clock.current_time(), "08:00:00 AM");

        clock.start().unwrap();
        assert!(clock.is_running());
        assert!(timer.is_active());
        assert_eq!(*events.borrow(), vec![ClockEvent::Started]);
    }

    #[test]
    fn test_realize_after_teardown_keeps_stopped_state() {
        let (mut clock, _) = clock_at(at(8, 0, 0));
        clock.realize(Box::new(ManualTimer::new())).unwrap();
        clock.stop().unwrap();
        clock.teardown();

        let timer = ManualTimer::new();
        clock.realize(Box::new(timer.clone())).unwrap();
        assert!(clock.is_realized());
        assert!(!clock.is_running());
        assert!(!timer.is_active());
    }

    #[test]
    fn test_realize_after_teardown_resumes_running() {
        let config = LedClockConfig {
            auto_start: false,
            ..LedClockConfig::default()
        };
        let mut clock =
            LedClock::with_time_source(&config, Box::new(FixedClock::new(at(8, 0, 0))));
        clock.realize(Box::new(ManualTimer::new())).unwrap();
        clock.start().unwrap();
        clock.teardown();
        let events = record(&mut clock);

        let timer = ManualTimer::new();
        clock.realize(Box::new(timer.clone())).unwrap();
        assert!(clock.is_running());
        assert!(timer.is_active());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_teardown_stops_timer_without_event() {
        let (mut clock, _) = clock_at(at(8, 0, 0));
        let timer = ManualTimer::new();
        clock.realize(Box::new(timer.clone())).unwrap();
        let events = record(&mut clock);

        clock.teardown();

        assert!(!timer.is_active());
        assert!(!clock.is_running());
        assert!(!clock.is_realized());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_drop_releases_timer() {
        let timer = ManualTimer::new();
        {
            let (mut clock, _) = clock_at(at(8, 0, 0));
            clock.realize(Box::new(timer.clone())).unwrap();
        }
        assert!(!timer.is_active());
        assert_eq!(timer.stop_count(), 1);
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let (mut clock, _) = clock_at(at(8, 0, 0));
        clock.realize(Box::new(ManualTimer::new())).unwrap();
        clock.subscribe(|_| panic!("listener failure"));
        let events = record(&mut clock);

        clock.handle_tick();

        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let (mut clock, _) = clock_at(at(8, 0, 0));
        clock.realize(Box::new(ManualTimer::new())).unwrap();
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let id = clock.subscribe(move |_| counter.set(counter.get() + 1));

        clock.handle_tick();
        assert!(clock.unsubscribe(id));
        assert!(!clock.unsubscribe(id));
        clock.handle_tick();

        assert_eq!(count.get(), 1);
        assert_eq!(clock.listener_count(), 0);
    }

    #[test]
    fn test_frame_and_config_snapshot() {
        let (mut clock, _) = clock_at(at(21, 15, 0));
        clock.realize(Box::new(ManualTimer::new())).unwrap();
        clock.set_use_24_hour_format(true);
        clock.set_led_color(Color::new(255, 0, 0));

        let frame = clock.frame();
        assert_eq!(frame.text, "21:15:00");
        assert_eq!(frame.led_color, Color::new(255, 0, 0));
        assert_eq!(frame.font_family, "Monospace");

        let config = clock.to_config(&LedClockConfig::default());
        assert_eq!(config.time_format, TimeFormat::Hour24);
        assert_eq!(config.led_color, Color::new(255, 0, 0));
    }

    #[test]
    fn test_about_message() {
        let (clock, _) = clock_at(at(0, 0, 0));
        let about = clock.about();
        assert_eq!(about.version, env!("CARGO_PKG_VERSION"));
        assert!(about.to_message().contains("Version: "));
    }
}
