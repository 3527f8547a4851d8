//! Configuration file management.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use time::Duration;

use wattlog_analysis::{DechargeConfig, ForecastConfig};

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default room name.
    #[serde(default)]
    pub room: Option<String>,

    /// Storage root override; defaults to the platform data directory.
    #[serde(default)]
    pub storage_root: Option<PathBuf>,

    /// Room aliases (friendly name -> room name).
    #[serde(default)]
    pub aliases: HashMap<String, String>,

    /// Analysis tuning.
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Analysis window and denomination overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// History window considered by the analysis commands, in days.
    #[serde(default = "default_recent_window_days")]
    pub recent_window_days: f64,

    /// Regression window for the exhaustion forecast, in days.
    #[serde(default = "default_fit_window_days")]
    pub fit_window_days: f64,

    /// Exhaustion warning horizon, in days.
    #[serde(default = "default_warning_horizon_days")]
    pub warning_horizon_days: f64,

    /// Supported recharge denominations in kWh; omit for the defaults.
    #[serde(default)]
    pub denominations: Option<Vec<f64>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            recent_window_days: default_recent_window_days(),
            fit_window_days: default_fit_window_days(),
            warning_horizon_days: default_warning_horizon_days(),
            denominations: None,
        }
    }
}

fn default_recent_window_days() -> f64 {
    7.0
}

fn default_fit_window_days() -> f64 {
    1.0
}

fn default_warning_horizon_days() -> f64 {
    3.0
}

fn days(value: f64) -> Duration {
    Duration::seconds_f64(value * 86_400.0)
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wattlog")
            .join("config.toml")
    }

    /// Load the config file, or defaults if none exists.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load a config file from an explicit path, or defaults if missing.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Resolve a room name, applying the alias table.
    ///
    /// Uses the explicitly requested name if given, otherwise the
    /// configured default room.
    pub fn resolve_room(&self, requested: Option<String>) -> Result<String> {
        let name = requested.or_else(|| self.room.clone()).with_context(|| {
            let mut known: Vec<&str> = self.aliases.keys().map(String::as_str).collect();
            known.sort_unstable();
            format!(
                "no room given; pass --room or set `room` in the config file (known aliases: {:?})",
                known
            )
        })?;

        Ok(self.aliases.get(&name).cloned().unwrap_or(name))
    }

    /// Recharge detection configuration.
    pub fn decharge_config(&self) -> DechargeConfig {
        match &self.analysis.denominations {
            Some(denominations) => DechargeConfig {
                denominations: denominations.clone(),
            },
            None => DechargeConfig::default(),
        }
    }

    /// Forecast configuration.
    pub fn forecast_config(&self) -> ForecastConfig {
        ForecastConfig {
            fit_window: days(self.analysis.fit_window_days),
            warning_horizon: days(self.analysis.warning_horizon_days),
        }
    }

    /// History window considered by the analysis commands.
    pub fn recent_window(&self) -> Duration {
        days(self.analysis.recent_window_days)
    }
}
