//! One check run: sample CPU, rank processes, pick a status, render output.

use std::fmt;

use crate::config::{CheckConfig, Thresholds};
use crate::error::CheckError;
use crate::format::{MAX_NAME_WIDTH, perf_data, truncate_unicode};
use crate::status::Status;
use crate::system::cpu::{CpuSampler, CpuTimesSource, CpuUtilization};
use crate::system::lister::{ProcessLister, top_processes};
use crate::system::process::RankedProcessList;

pub const PLUGIN_NAME: &str = "cpu-process-profiler";

/// CRITICAL above `critical`, WARNING above `warning`, OK otherwise.
pub fn evaluate(used_percent: f64, thresholds: &Thresholds) -> Status {
    if used_percent > thresholds.critical {
        Status::Critical
    } else if used_percent > thresholds.warning {
        Status::Warning
    } else {
        Status::Ok
    }
}

#[derive(Clone, Debug)]
pub struct CheckReport {
    pub status: Status,
    pub utilization: CpuUtilization,
    pub processes: RankedProcessList,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{PLUGIN_NAME} {}: {:.2}% CPU usage | {}",
            self.status,
            self.utilization.used,
            perf_data(&self.utilization)
        )?;
        writeln!(f)?;
        writeln!(f, "Top CPU processes:")?;
        for process in &self.processes {
            writeln!(
                f,
                "PID {} ({}): {:.2}%",
                process.pid,
                truncate_unicode(&process.name, MAX_NAME_WIDTH),
                process.cpu_percent
            )?;
        }
        Ok(())
    }
}

/// Output line for a run that could not produce a report.
pub fn render_failure(err: &CheckError) -> String {
    format!("{PLUGIN_NAME} {}: {err}", err.status())
}

/// Measure and rank according to `config`.
///
/// The lister is primed before the sampler sleeps so that interval-based
/// listers observe the same window as the CPU counters.
pub fn run_check<S, L>(
    config: &CheckConfig,
    source: S,
    lister: &mut L,
) -> Result<CheckReport, CheckError>
where
    S: CpuTimesSource,
    L: ProcessLister + ?Sized,
{
    let _span = tracing::info_span!("check", lister = lister.name()).entered();

    lister.prime()?;
    let utilization = CpuSampler::new(source, config.sample_interval).sample()?;
    let processes = top_processes(lister, config.limit)?;
    let status = evaluate(utilization.used, &config.thresholds);

    tracing::info!(
        %status,
        used = utilization.used,
        processes = processes.len(),
        "check complete"
    );
    Ok(CheckReport {
        status,
        utilization,
        processes,
    })
}
