use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::system::lister::Strategy;
use crate::system::process::DEFAULT_LIMIT;

/// Contents of the optional TOML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub thresholds: ThresholdsConfig,
    pub sampling: SamplingConfig,
    pub processes: ProcessesConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub critical: f64,
    pub warning: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        ThresholdsConfig {
            critical: 90.0,
            warning: 75.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub interval_secs: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig { interval_secs: 2 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProcessesConfig {
    pub limit: usize,
    pub strategy: Strategy,
}

impl Default for ProcessesConfig {
    fn default() -> Self {
        ProcessesConfig {
            limit: DEFAULT_LIMIT,
            strategy: Strategy::Direct,
        }
    }
}

/// Values given on the command line; each one wins over the file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub critical: Option<f64>,
    pub warning: Option<f64>,
    pub sample_interval: Option<u64>,
    pub limit: Option<usize>,
    pub strategy: Option<Strategy>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    pub critical: f64,
    pub warning: f64,
}

/// Validated settings for one check run.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckConfig {
    pub thresholds: Thresholds,
    pub sample_interval: Duration,
    pub limit: usize,
    pub strategy: Strategy,
}

impl CheckConfig {
    pub fn resolve(file: FileConfig, overrides: &Overrides) -> Result<Self, ConfigError> {
        let critical = overrides.critical.unwrap_or(file.thresholds.critical);
        let warning = overrides.warning.unwrap_or(file.thresholds.warning);
        let interval_secs = overrides
            .sample_interval
            .unwrap_or(file.sampling.interval_secs);
        let limit = overrides.limit.unwrap_or(file.processes.limit);
        let strategy = overrides.strategy.unwrap_or(file.processes.strategy);

        require_positive("critical", critical)?;
        require_positive("warning", warning)?;
        if warning > critical {
            return Err(ConfigError::WarningAboveCritical { warning, critical });
        }
        if interval_secs == 0 {
            return Err(ConfigError::NotPositive {
                flag: "sample-interval",
                value: interval_secs.to_string(),
            });
        }
        if limit == 0 {
            return Err(ConfigError::NotPositive {
                flag: "limit",
                value: limit.to_string(),
            });
        }

        Ok(CheckConfig {
            thresholds: Thresholds { critical, warning },
            sample_interval: Duration::from_secs(interval_secs),
            limit,
            strategy,
        })
    }
}

fn require_positive(flag: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive {
            flag,
            value: value.to_string(),
        })
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cpu-process-profiler").join("config.toml"))
}

/// The file at the default location, or defaults when there is none.
pub fn load_config() -> Result<FileConfig, ConfigError> {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Ok(FileConfig::default()),
    }
}

pub fn load_config_from_path(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
