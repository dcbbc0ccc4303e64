//! GTK host for the LED clock
//!
//! Wraps a [`LedClock`] in a `DrawingArea`. The tick timer is created when
//! the area is realized and released when it is unrealized. Operation
//! failures are shown in an alert rather than returned, since this widget is
//! the end of the call chain.

use gtk4::prelude::*;
use gtk4::DrawingArea;
use led_clock_core::{
    ClockError, ClockEvent, LedClock, LedClockConfig, ListenerId, SystemClock, TICK_INTERVAL,
};
use led_clock_render::render_led_clock;
use led_clock_types::Color;
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;

use super::alerts::{show_about, show_error};
use super::glib_timer::GlibTickTimer;

/// LED clock hosted in a GTK drawing area
#[derive(Clone)]
pub struct LedClockWidget {
    drawing_area: DrawingArea,
    clock: Rc<RefCell<LedClock>>,
}

impl LedClockWidget {
    /// Create the widget. Fails only if the configured timezone is unknown.
    pub fn new(config: &LedClockConfig) -> Result<Self, ClockError> {
        let time_source = SystemClock::from_timezone(&config.timezone)?;
        let clock = Rc::new(RefCell::new(LedClock::with_time_source(
            config,
            Box::new(time_source),
        )));

        let drawing_area = DrawingArea::new();
        drawing_area.set_size_request(config.width, config.height);
        drawing_area.set_hexpand(true);
        drawing_area.set_vexpand(true);

        let widget = Self {
            drawing_area,
            clock,
        };
        widget.connect_redraw();
        widget.connect_draw();
        widget.connect_lifecycle();
        Ok(widget)
    }

    pub fn widget(&self) -> &DrawingArea {
        &self.drawing_area
    }

    fn connect_redraw(&self) {
        let area_weak = self.drawing_area.downgrade();
        self.clock.borrow_mut().set_redraw_handler(move || {
            if let Some(area) = area_weak.upgrade() {
                area.queue_draw();
            }
        });
    }

    fn connect_draw(&self) {
        let clock = self.clock.clone();
        self.drawing_area.set_draw_func(move |_, cr, width, height| {
            // Skip the frame rather than panic if a mutation is in progress
            let Ok(mut clock) = clock.try_borrow_mut() else {
                return;
            };
            clock.take_redraw_request();
            let frame = clock.frame();
            drop(clock);

            if let Err(e) = render_led_clock(cr, &frame, width as f64, height as f64) {
                warn!("LED clock render failed: {}", e);
            }
        });
    }

    fn connect_lifecycle(&self) {
        let clock = self.clock.clone();
        self.drawing_area.connect_realize(move |area| {
            let clock_weak = Rc::downgrade(&clock);
            let timer = GlibTickTimer::new(TICK_INTERVAL, move || {
                let Some(clock) = clock_weak.upgrade() else {
                    return false;
                };
                match clock.try_borrow_mut() {
                    Ok(mut clock) => clock.handle_tick(),
                    Err(_) => debug!("Clock busy, skipping tick"),
                }
                true
            });

            let result = clock.borrow_mut().realize(Box::new(timer));
            match result {
                Ok(()) => info!("LED clock widget realized"),
                Err(e) => show_error(area, "initializing LED clock", &e),
            }
        });

        let clock = self.clock.clone();
        self.drawing_area.connect_unrealize(move |_| {
            clock.borrow_mut().teardown();
        });
    }

    /// Run a fallible clock operation, reporting failure through an alert
    fn run(&self, action: &str, op: impl FnOnce(&mut LedClock) -> Result<(), ClockError>) {
        if let Some(Err(e)) = write_clock(&self.clock, action, op) {
            show_error(&self.drawing_area, action, &e);
        }
    }

    /// Apply an infallible mutation; skipped if called from inside a clock event
    fn update(&self, action: &str, op: impl FnOnce(&mut LedClock)) {
        write_clock(&self.clock, action, op);
    }

    pub fn start(&self) {
        self.run("starting clock", LedClock::start);
    }

    pub fn stop(&self) {
        self.run("stopping clock", LedClock::stop);
    }

    pub fn set_running(&self, running: bool) {
        self.run("changing clock state", |clock| clock.set_running(running));
    }

    /// Reports `false` while the clock is busy delivering an event
    pub fn is_running(&self) -> bool {
        read_clock(&self.clock, "reading clock state", LedClock::is_running).unwrap_or(false)
    }

    pub fn set_led_color(&self, color: Color) {
        self.update("setting LED color", |clock| clock.set_led_color(color));
    }

    pub fn set_led_color_rgb(&self, red: i32, green: i32, blue: i32) {
        self.update("setting LED color", |clock| {
            clock.set_led_color_rgb(red, green, blue)
        });
    }

    pub fn set_background_color(&self, color: Color) {
        self.update("setting background color", |clock| {
            clock.set_background_color(color)
        });
    }

    pub fn set_background_color_rgb(&self, red: i32, green: i32, blue: i32) {
        self.update("setting background color", |clock| {
            clock.set_background_color_rgb(red, green, blue)
        });
    }

    pub fn set_use_24_hour_format(&self, value: bool) {
        self.update("changing time format", |clock| {
            clock.set_use_24_hour_format(value)
        });
    }

    pub fn set_show_seconds(&self, value: bool) {
        self.update("changing seconds display", |clock| {
            clock.set_show_seconds(value)
        });
    }

    /// `None` while the clock is busy delivering an event
    pub fn current_time(&self) -> Option<String> {
        read_clock(&self.clock, "reading current time", |clock| {
            clock.current_time().to_string()
        })
    }

    pub fn about(&self) {
        if let Some(about) = read_clock(&self.clock, "showing about", LedClock::about) {
            show_about(&self.drawing_area, &about);
        }
    }

    /// Register for clock events. `None` if called from inside a clock event.
    ///
    /// Listeners run while the clock is borrowed, so they must not call back
    /// into this widget synchronously; defer with `glib::idle_add_local_once`.
    pub fn subscribe<F>(&self, listener: F) -> Option<ListenerId>
    where
        F: FnMut(&ClockEvent) + 'static,
    {
        write_clock(&self.clock, "subscribing", |clock| clock.subscribe(listener))
    }

    /// Current clock settings merged into `base`; `base` itself while busy
    pub fn to_config(&self, base: &LedClockConfig) -> LedClockConfig {
        read_clock(&self.clock, "saving clock settings", |clock| clock.to_config(base))
            .unwrap_or_else(|| base.clone())
    }
}

fn read_clock<T>(
    clock: &RefCell<LedClock>,
    action: &str,
    op: impl FnOnce(&LedClock) -> T,
) -> Option<T> {
    match clock.try_borrow() {
        Ok(clock) => Some(op(&clock)),
        Err(_) => {
            warn!("Clock busy, ignoring request while {}", action);
            None
        }
    }
}

fn write_clock<T>(
    clock: &RefCell<LedClock>,
    action: &str,
    op: impl FnOnce(&mut LedClock) -> T,
) -> Option<T> {
    match clock.try_borrow_mut() {
        Ok(mut clock) => Some(op(&mut clock)),
        Err(_) => {
            warn!("Clock busy, ignoring request while {}", action);
            None
        }
    }
}
