//! Main application window: the clock plus a header bar of controls

use gtk4::glib;
use gtk4::prelude::*;
use gtk4::{
    Application, ApplicationWindow, Button, CheckButton, ColorDialog, ColorDialogButton, HeaderBar,
    ToggleButton,
};
use led_clock_core::ClockEvent;
use led_clock_types::Color;
use log::{info, warn};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use super::alerts::show_error;
use super::led_clock_widget::LedClockWidget;
use crate::config::AppConfig;

const WINDOW_TITLE: &str = "LED Clock";

fn opaque_color_dialog() -> ColorDialog {
    let dialog = ColorDialog::new();
    dialog.set_with_alpha(false);
    dialog
}

/// Build and present the main window.
///
/// Settings are written back on close, to `config_path` when given or to
/// the default location otherwise.
pub fn build_main_window(
    app: &Application,
    app_config: Rc<RefCell<AppConfig>>,
    config_path: Option<PathBuf>,
) {
    let (width, height, clock_config) = {
        let cfg = app_config.borrow();
        (cfg.window.width, cfg.window.height, cfg.clock.clone())
    };

    let window = ApplicationWindow::builder()
        .application(app)
        .title(WINDOW_TITLE)
        .default_width(width)
        .default_height(height)
        .build();

    let clock = match LedClockWidget::new(&clock_config) {
        Ok(clock) => clock,
        Err(e) => {
            warn!("{}; falling back to local time", e);
            let fallback = led_clock_types::LedClockConfig {
                timezone: "Local".to_string(),
                ..clock_config.clone()
            };
            match LedClockWidget::new(&fallback) {
                Ok(clock) => clock,
                Err(e) => {
                    show_error(&window, "creating LED clock", &e);
                    window.present();
                    return;
                }
            }
        }
    };

    let header = HeaderBar::new();

    let run_toggle = ToggleButton::with_label("Running");
    run_toggle.set_active(clock_config.auto_start);
    header.pack_start(&run_toggle);

    let hour24_check = CheckButton::with_label("24h");
    hour24_check.set_active(clock_config.time_format.is_24_hour());
    header.pack_start(&hour24_check);

    let seconds_check = CheckButton::with_label("Seconds");
    seconds_check.set_active(clock_config.show_seconds);
    header.pack_start(&seconds_check);

    let about_button = Button::with_label("About");
    header.pack_end(&about_button);

    let background_button = ColorDialogButton::new(Some(opaque_color_dialog()));
    background_button.set_rgba(&clock_config.background_color.to_gdk_rgba());
    background_button.set_tooltip_text(Some("Background color"));
    header.pack_end(&background_button);

    let led_button = ColorDialogButton::new(Some(opaque_color_dialog()));
    led_button.set_rgba(&clock_config.led_color.to_gdk_rgba());
    led_button.set_tooltip_text(Some("LED color"));
    header.pack_end(&led_button);

    window.set_titlebar(Some(&header));
    window.set_child(Some(clock.widget()));

    {
        let clock = clock.clone();
        run_toggle.connect_toggled(move |button| {
            if button.is_active() != clock.is_running() {
                clock.set_running(button.is_active());
            }
            // Keep the button honest if the request failed
            button.set_active(clock.is_running());
        });
    }
    {
        let clock = clock.clone();
        hour24_check.connect_toggled(move |check| clock.set_use_24_hour_format(check.is_active()));
    }
    {
        let clock = clock.clone();
        seconds_check.connect_toggled(move |check| clock.set_show_seconds(check.is_active()));
    }
    {
        let clock = clock.clone();
        led_button.connect_rgba_notify(move |button| {
            clock.set_led_color(Color::from_gdk_rgba(&button.rgba()));
        });
    }
    {
        let clock = clock.clone();
        background_button.connect_rgba_notify(move |button| {
            clock.set_background_color(Color::from_gdk_rgba(&button.rgba()));
        });
    }
    {
        let clock = clock.clone();
        about_button.connect_clicked(move |_| clock.about());
    }

    // Clock events fire while the clock is borrowed; widget updates that
    // call back into it are deferred to idle.
    let window_weak = window.downgrade();
    let toggle_weak = run_toggle.downgrade();
    clock.subscribe(move |event| match event {
        ClockEvent::Tick(time) => {
            if let Some(window) = window_weak.upgrade() {
                window.set_title(Some(&format!("{} - {}", WINDOW_TITLE, time)));
            }
        }
        ClockEvent::Started | ClockEvent::Stopped => {
            let running = matches!(event, ClockEvent::Started);
            info!("{}", event.name());
            let toggle_weak = toggle_weak.clone();
            glib::idle_add_local_once(move || {
                if let Some(toggle) = toggle_weak.upgrade() {
                    toggle.set_active(running);
                }
            });
        }
    });

    // Realize may auto-start silently or fail to start; re-read the state
    {
        let area = clock.widget().clone();
        let clock = clock.clone();
        let toggle_weak = run_toggle.downgrade();
        area.connect_realize(move |_| {
            if let Some(toggle) = toggle_weak.upgrade() {
                toggle.set_active(clock.is_running());
            }
        });
    }

    {
        window.connect_close_request(move |window| {
            {
                let mut cfg = app_config.borrow_mut();
                cfg.window.width = window.width();
                cfg.window.height = window.height();
                let updated = clock.to_config(&cfg.clock);
                cfg.clock = updated;
            }

            let cfg = app_config.borrow();
            let result = match config_path {
                Some(ref path) => cfg.save_to_path(path),
                None => cfg.save(),
            };
            match result {
                Ok(()) => info!("Configuration saved"),
                Err(e) => warn!("Failed to save configuration: {}", e),
            }
            glib::Propagation::Proceed
        });
    }

    window.present();
}
