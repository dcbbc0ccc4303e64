//! Application and clock configuration

use anyhow::Result;
use led_clock_types::{Color, LedClockConfig, TimeFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Current config format version
pub const CONFIG_VERSION: u32 = 1;

fn default_version() -> u32 {
    CONFIG_VERSION
}

/// Application-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    /// Window dimensions
    #[serde(default)]
    pub window: WindowConfig,
    /// Clock display settings
    #[serde(default)]
    pub clock: LedClockConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults when no file exists
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from_path(&config_path)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("org", "led-clock", "led-clock")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            window: WindowConfig::default(),
            clock: LedClockConfig::default(),
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 120,
        }
    }
}

/// Clock settings given on the command line; each set field wins over the file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClockOverrides {
    pub use_24_hour: bool,
    pub hide_seconds: bool,
    pub led_color: Option<Color>,
    pub background_color: Option<Color>,
    pub timezone: Option<String>,
    pub stopped: bool,
}

impl ClockOverrides {
    pub fn apply(&self, config: &mut LedClockConfig) {
        if self.use_24_hour {
            config.time_format = TimeFormat::Hour24;
        }
        if self.hide_seconds {
            config.show_seconds = false;
        }
        if let Some(color) = self.led_color {
            config.led_color = color;
        }
        if let Some(color) = self.background_color {
            config.background_color = color;
        }
        if let Some(ref tz) = self.timezone {
            config.timezone = tz.clone();
        }
        if self.stopped {
            config.auto_start = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("led-clock-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_save_and_load_from_path() {
        let path = temp_path("round.json");
        let mut config = AppConfig::default();
        config.window.width = 640;
        config.clock.time_format = TimeFormat::Hour24;
        config.clock.led_color = Color::new(255, 128, 0);

        config.save_to_path(&path).unwrap();
        let loaded = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let path = temp_path("partial.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"clock":{"show_seconds":false}}"#).unwrap();

        let loaded = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.version, CONFIG_VERSION);
        assert_eq!(loaded.window, WindowConfig::default());
        assert!(!loaded.clock.show_seconds);
        assert_eq!(loaded.clock.led_color, Color::LIME);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let path = temp_path("broken.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"clock":{"led_color":"green"}}"#).unwrap();

        assert!(AppConfig::load_from_path(&path).is_err());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_overrides_apply_only_set_fields() {
        let mut config = LedClockConfig::default();
        ClockOverrides::default().apply(&mut config);
        assert_eq!(config, LedClockConfig::default());

        let overrides = ClockOverrides {
            use_24_hour: true,
            hide_seconds: true,
            background_color: Some(Color::new(0, 0, 64)),
            timezone: Some("Europe/Berlin".to_string()),
            stopped: true,
            ..ClockOverrides::default()
        };
        overrides.apply(&mut config);

        assert_eq!(config.time_format, TimeFormat::Hour24);
        assert!(!config.show_seconds);
        assert_eq!(config.led_color, Color::LIME);
        assert_eq!(config.background_color, Color::new(0, 0, 64));
        assert_eq!(config.timezone, "Europe/Berlin");
        assert!(!config.auto_start);
    }
}
