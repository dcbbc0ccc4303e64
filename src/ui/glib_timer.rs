//! GLib-backed tick timer

use gtk4::glib;
use led_clock_core::{ClockError, TickTimer};
use std::rc::Rc;
use std::time::Duration;

/// [`TickTimer`] scheduling `on_tick` on the GTK main loop.
///
/// `on_tick` returns `false` once its target is gone, which removes the source.
pub struct GlibTickTimer {
    interval: Duration,
    on_tick: Rc<dyn Fn() -> bool>,
    source: Option<glib::SourceId>,
}

impl GlibTickTimer {
    pub fn new<F>(interval: Duration, on_tick: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Self {
            interval,
            on_tick: Rc::new(on_tick),
            source: None,
        }
    }
}

impl TickTimer for GlibTickTimer {
    fn start(&mut self) -> Result<(), ClockError> {
        if self.source.is_some() {
            return Ok(());
        }
        if !glib::MainContext::default().is_owner() {
            return Err(ClockError::Timer(
                "GTK main context is not owned by this thread".to_string(),
            ));
        }

        let on_tick = self.on_tick.clone();
        let id = glib::timeout_add_local(self.interval, move || {
            if on_tick() {
                glib::ControlFlow::Continue
            } else {
                glib::ControlFlow::Break
            }
        });
        self.source = Some(id);
        log::debug!("GLib tick timer started ({:?})", self.interval);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ClockError> {
        if let Some(id) = self.source.take() {
            id.remove();
            log::debug!("GLib tick timer stopped");
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.source.is_some()
    }
}

impl Drop for GlibTickTimer {
    fn drop(&mut self) {
        if let Some(id) = self.source.take() {
            id.remove();
        }
    }
}
