//! Application settings loaded from a TOML file
//!
//! Every section and field has a default, so a partial file (or none at all)
//! still yields a complete configuration.

use crate::cli::{ButtonTiming, DEFAULT_MASH_PRESSES};
use crate::controller::{STICK_CENTER, STICK_MAX, STICK_MIN};
use crate::mapping::translator::{TranslatorSettings, DEFAULT_STICK_STEP};
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const CONFIG_DIR: &str = "padconsole";
const CONFIG_FILE: &str = "config.toml";

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub stick: StickConfig,
    pub buttons: ButtonConfig,
    pub mash: MashConfig,
    pub session: SessionConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StickConfig {
    pub center: i32,
    /// Displacement per stick key press
    pub step: i32,
}

impl Default for StickConfig {
    fn default() -> Self {
        Self {
            center: STICK_CENTER,
            step: DEFAULT_STICK_STEP,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ButtonConfig {
    pub push_duration_ms: u64,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            push_duration_ms: 100,
        }
    }
}

/// Mash triggered from the keyboard
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MashConfig {
    pub interval_ms: u64,
    pub presses: u32,
}

impl Default for MashConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            presses: DEFAULT_MASH_PRESSES,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub prompt: String,
    pub event_buffer: usize,
    pub report_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt: "cmd >> ".to_string(),
            event_buffer: 100,
            report_buffer: 100,
        }
    }
}

impl AppConfig {
    /// Loads `path`, or the file in the user config directory when `None`
    pub async fn load(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => match default_config_path() {
                Some(path) => path,
                None => {
                    info!("No config directory available, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        Self::load_from(&path).await
    }

    pub async fn load_from(path: &Path) -> Result<Self> {
        if !tokio::fs::try_exists(path)
            .await
            .map_err(|e| eyre!("Failed to check config file {}: {}", path.display(), e))?
        {
            info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;
        config.validate()?;

        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(STICK_MIN..=STICK_MAX).contains(&self.stick.center) {
            return Err(eyre!(
                "Stick center {} is outside of [{}, {}]",
                self.stick.center,
                STICK_MIN,
                STICK_MAX
            ));
        }
        // Keeps the unclamped accumulators far away from i32 overflow
        if !(1..=STICK_MAX).contains(&self.stick.step) {
            return Err(eyre!(
                "Stick step {} is outside of [1, {}]",
                self.stick.step,
                STICK_MAX
            ));
        }
        if self.session.event_buffer == 0 || self.session.report_buffer == 0 {
            return Err(eyre!("Channel buffers must hold at least one message"));
        }
        if self.mash.presses == 0 {
            return Err(eyre!("Mash presses must be at least 1"));
        }
        Ok(())
    }

    pub fn translator_settings(&self) -> TranslatorSettings {
        TranslatorSettings {
            center: self.stick.center,
            step: self.stick.step,
        }
    }

    pub fn button_timing(&self) -> ButtonTiming {
        ButtonTiming {
            push_duration: Duration::from_millis(self.buttons.push_duration_ms),
        }
    }

    /// Arguments of the `mash` command run for the keyboard mash key
    pub fn mash_args(&self) -> Vec<String> {
        vec![
            "a".to_string(),
            (self.mash.interval_ms as f64 / 1000.0).to_string(),
            self.mash.presses.to_string(),
        ]
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}
