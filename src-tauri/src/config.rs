use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::capture::CaptureConfig;
use crate::identification::{controller::DEFAULT_RESULTS_GRACE_MS, SimulatorConfig};
use crate::theme::ThemeMode;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Startup configuration. Read once, never written back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub simulator: SimulatorConfig,
    pub capture: CaptureConfig,
    pub results_grace_ms: u64,
    pub theme: ThemeMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            simulator: SimulatorConfig::default(),
            capture: CaptureConfig::default(),
            results_grace_ms: DEFAULT_RESULTS_GRACE_MS,
            theme: ThemeMode::default(),
        }
    }
}

impl AppConfig {
    /// Reads `path` if it exists. A file that does not parse falls back to
    /// the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        match serde_json::from_str(&contents) {
            Ok(config) => Ok(config),
            Err(err) => {
                warn!(
                    "Ignoring malformed config at {}: {err}; using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
        }
    }
}

/// `MOOVY_DEBUG=1` (or `true`) turns on debug logging.
pub fn debug_enabled() -> bool {
    std::env::var("MOOVY_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
