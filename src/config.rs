//! Application-level configuration: phase timing and the answer colour palette.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "HOTSEAT_BACK_CONFIG_PATH";
/// Countdown length applied before each question opens.
const DEFAULT_COUNTDOWN_SECS: u64 = 3;

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    countdown_secs: u64,
    colours: Vec<String>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// baked-in defaults when the file is absent or malformed.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        countdown_secs = config.countdown_secs,
                        colours = config.colours.len(),
                        "loaded configuration from file"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Countdown duration before a question opens.
    pub fn countdown(&self) -> Duration {
        Duration::from_secs(self.countdown_secs)
    }

    /// Palette used when assigning display colours to answer options.
    pub fn colours(&self) -> &[String] {
        &self.colours
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            colours: default_colours(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file.
struct RawConfig {
    #[serde(default)]
    countdown_secs: Option<u64>,
    #[serde(default)]
    colours: Option<Vec<String>>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            countdown_secs: raw.countdown_secs.unwrap_or(defaults.countdown_secs),
            colours: raw
                .colours
                .filter(|palette| !palette.is_empty())
                .unwrap_or(defaults.colours),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in colour palette shipped with the binary.
fn default_colours() -> Vec<String> {
    ["red", "blue", "green", "yellow", "purple", "pink", "orange"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.countdown(), Duration::from_secs(3));
        assert!(!config.colours().is_empty());
    }

    #[test]
    fn raw_config_merges_with_defaults() {
        let raw: RawConfig = serde_json::from_str(r#"{"countdown_secs": 5}"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.countdown(), Duration::from_secs(5));
        assert_eq!(config.colours(), AppConfig::default().colours());
    }

    #[test]
    fn empty_palette_falls_back_to_defaults() {
        let raw: RawConfig = serde_json::from_str(r#"{"colours": []}"#).unwrap();
        let config: AppConfig = raw.into();
        assert!(!config.colours().is_empty());
    }
}
