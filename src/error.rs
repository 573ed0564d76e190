//! Failure modes of a check run.
//!
//! Configuration problems abort before anything is measured and surface as
//! WARNING. Everything that goes wrong while measuring surfaces as CRITICAL.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::status::Status;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("--{flag} must be greater than 0 (got {value})")]
    NotPositive { flag: &'static str, value: String },

    #[error("--warning ({warning}) cannot be greater than --critical ({critical})")]
    WarningAboveCritical { warning: f64, critical: f64 },

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid arguments: {0}")]
    Arguments(String),
}

#[derive(Error, Debug)]
pub enum MeasurementError {
    #[error("failed to read CPU counters from {path}: {source}")]
    Read {
        path: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse CPU counters: {0}")]
    Parse(String),

    #[error("CPU counters did not advance (total delta {0:.4}s)")]
    NoElapsedTime(f64),

    #[error("CPU counters are unavailable: {0}")]
    Unavailable(String),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(&'static str),
}

#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("process listing is not supported on {0}")]
    UnsupportedPlatform(&'static str),
}

#[derive(Error, Debug)]
pub enum CheckError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("error obtaining CPU timings: {0}")]
    Measurement(#[from] MeasurementError),

    #[error("error obtaining top CPU processes: {0}")]
    Acquisition(#[from] AcquisitionError),
}

impl CheckError {
    pub fn status(&self) -> Status {
        match self {
            CheckError::Config(_) => Status::Warning,
            CheckError::Measurement(_) | CheckError::Acquisition(_) => Status::Critical,
        }
    }
}
