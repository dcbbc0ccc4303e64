use anyhow::{Context, Result};
use clap::Parser;
use gtk4::prelude::*;
use gtk4::Application;
use led_clock::config::{AppConfig, ClockOverrides};
use led_clock::ui::build_main_window;
use led_clock_core::{LedClock, ManualTimer, SystemClock};
use led_clock_render::render_to_png;
use led_clock_types::Color;
use log::{error, info, warn};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

const APP_ID: &str = "org.led_clock.LedClock";

/// led-clock - An LED-style digital clock
#[derive(Parser, Debug, Clone)]
#[command(name = "led-clock")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Configuration file to load and save instead of the default location
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Use 24-hour format
    #[arg(long = "24h")]
    use_24_hour: bool,

    /// Hide seconds
    #[arg(long = "no-seconds")]
    no_seconds: bool,

    /// LED color as #rrggbb or a packed value (red in the low byte)
    #[arg(long = "led-color", value_name = "COLOR", value_parser = parse_color)]
    led_color: Option<Color>,

    /// Background color as #rrggbb or a packed value (red in the low byte)
    #[arg(long = "background-color", value_name = "COLOR", value_parser = parse_color)]
    background_color: Option<Color>,

    /// Timezone ID (e.g., Europe/London), or Local
    #[arg(long = "timezone", value_name = "ZONE")]
    timezone: Option<String>,

    /// Do not start the clock automatically
    #[arg(long = "stopped")]
    stopped: bool,

    /// Render a single frame to a PNG file and exit
    #[arg(long = "snapshot", value_name = "PNG")]
    snapshot: Option<PathBuf>,
}

fn parse_color(s: &str) -> Result<Color, String> {
    Color::parse(s).map_err(|e| e.to_string())
}

impl Cli {
    fn overrides(&self) -> ClockOverrides {
        ClockOverrides {
            use_24_hour: self.use_24_hour,
            hide_seconds: self.no_seconds,
            led_color: self.led_color,
            background_color: self.background_color,
            timezone: self.timezone.clone(),
            stopped: self.stopped,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting led-clock v{}", env!("CARGO_PKG_VERSION"));

    let mut app_config = load_config(cli.config.as_ref());
    cli.overrides().apply(&mut app_config.clock);

    if let Some(ref path) = cli.snapshot {
        if let Err(e) = write_snapshot(&app_config, path) {
            error!("Snapshot failed: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    let app = Application::builder().application_id(APP_ID).build();

    let app_config = Rc::new(RefCell::new(app_config));
    let config_path = cli.config.clone();
    app.connect_activate(move |app| {
        build_main_window(app, app_config.clone(), config_path.clone());
    });

    // Run the application (pass empty args since we already parsed them)
    app.run_with_args(&["led-clock"]);
}

fn load_config(path: Option<&PathBuf>) -> AppConfig {
    let loaded = match path {
        Some(path) => AppConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config file '{}'", path.display())),
        None => AppConfig::load(),
    };
    match loaded {
        Ok(config) => {
            info!("Loaded configuration");
            config
        }
        Err(e) => {
            warn!("{:#}; using defaults", e);
            AppConfig::default()
        }
    }
}

/// Render the current time once, without a display connection
fn write_snapshot(app_config: &AppConfig, path: &Path) -> Result<()> {
    let config = &app_config.clock;
    let time_source = SystemClock::from_timezone(&config.timezone)?;
    let mut clock = LedClock::with_time_source(config, Box::new(time_source));
    clock.realize(Box::new(ManualTimer::new()))?;

    render_to_png(&clock.frame(), config.width, config.height, path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
