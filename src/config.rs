use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::command::{CommandRule, default_rules};
use crate::gesture::{DEFAULT_HOLD, DEFAULT_WINDOW, GestureMessages};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Upper bound for gesture timings (ms)
pub const MAX_GESTURE_MS: u64 = 10_000;
/// Upper bound for the listening auto-stop (s)
pub const MAX_AUTO_STOP_SECS: u64 = 3600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Page the session starts on and "back to home" returns to
    #[serde(default = "default_home_page")]
    pub home_page: String,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub listening: ListeningConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            home_page: default_home_page(),
            gesture: GestureConfig::default(),
            listening: ListeningConfig::default(),
            commands: CommandsConfig::default(),
        }
    }
}

fn default_home_page() -> String {
    "home.html".into()
}

// ============================================================================
// Gesture Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GestureConfig {
    /// Maximum time between the two taps of a double-tap (ms)
    #[serde(default = "default_double_tap_window")]
    pub double_tap_window_ms: u64,

    /// Hold time before the voice button starts listening (ms)
    #[serde(default = "default_long_press")]
    pub long_press_ms: u64,

    /// Wording for the quit control
    #[serde(default)]
    pub quit: MessageOverrides,

    /// Wording for the decline control on the signup/signin pages
    #[serde(default)]
    pub decline: MessageOverrides,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            double_tap_window_ms: default_double_tap_window(),
            long_press_ms: default_long_press(),
            quit: MessageOverrides::default(),
            decline: MessageOverrides::default(),
        }
    }
}

impl GestureConfig {
    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }

    pub fn quit_messages(&self) -> GestureMessages {
        self.quit.apply(GestureMessages::quit())
    }

    pub fn decline_messages(&self) -> GestureMessages {
        self.decline.apply(GestureMessages::decline())
    }
}

/// Per-control wording; unset keys keep that control's defaults
#[derive(Debug, Default, Deserialize)]
pub struct MessageOverrides {
    pub first_tap: Option<String>,
    pub first_key: Option<String>,
    pub timed_out: Option<String>,
    pub timed_out_key: Option<String>,
    pub confirmed: Option<String>,
}

impl MessageOverrides {
    fn apply(&self, base: GestureMessages) -> GestureMessages {
        let pick = |set: &Option<String>, default: String| set.clone().unwrap_or(default);
        GestureMessages {
            first_tap: pick(&self.first_tap, base.first_tap),
            first_key: pick(&self.first_key, base.first_key),
            timed_out: pick(&self.timed_out, base.timed_out),
            timed_out_key: pick(&self.timed_out_key, base.timed_out_key),
            confirmed: pick(&self.confirmed, base.confirmed),
        }
    }
}

fn default_double_tap_window() -> u64 {
    DEFAULT_WINDOW.as_millis() as u64
}

fn default_long_press() -> u64 {
    DEFAULT_HOLD.as_millis() as u64
}

// ============================================================================
// Listening Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListeningConfig {
    /// Stop listening automatically after this many seconds
    #[serde(default = "default_auto_stop")]
    pub auto_stop_secs: u64,
}

impl Default for ListeningConfig {
    fn default() -> Self {
        Self {
            auto_stop_secs: default_auto_stop(),
        }
    }
}

impl ListeningConfig {
    pub fn auto_stop(&self) -> Duration {
        Duration::from_secs(self.auto_stop_secs)
    }
}

fn default_auto_stop() -> u64 {
    10
}

// ============================================================================
// Commands Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CommandsConfig {
    /// Voice menu, evaluated top to bottom
    #[serde(default = "default_rules")]
    pub rules: Vec<CommandRule>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
        }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to defaults
    pub fn load() -> Self {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if !path.exists() {
            return Config::default();
        }
        match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "using default config");
                Config::default()
            }
        }
    }

    /// Load and validate a config file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "gesture.double_tap_window_ms",
            self.gesture.double_tap_window_ms,
            MAX_GESTURE_MS,
        )?;
        check_range("gesture.long_press_ms", self.gesture.long_press_ms, MAX_GESTURE_MS)?;
        check_range(
            "listening.auto_stop_secs",
            self.listening.auto_stop_secs,
            MAX_AUTO_STOP_SECS,
        )?;
        if self.home_page.trim().is_empty() {
            return Err(ConfigError::Invalid("home_page must not be empty".into()));
        }
        if self.commands.rules.is_empty() {
            return Err(ConfigError::Invalid(
                "commands.rules must contain at least one rule".into(),
            ));
        }
        for (i, rule) in self.commands.rules.iter().enumerate() {
            if rule.destination.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "commands.rules[{}] has no destination",
                    i
                )));
            }
            if rule.keywords.is_empty() || rule.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "commands.rules[{}] needs non-empty keywords",
                    i
                )));
            }
        }
        Ok(())
    }
}

fn check_range(key: &str, value: u64, max: u64) -> Result<(), ConfigError> {
    if value == 0 || value > max {
        return Err(ConfigError::Invalid(format!(
            "{} must be between 1 and {}, got {}",
            key, max, value
        )));
    }
    Ok(())
}
