use super::{ListingCommand, PlatformExtensions};
use crate::error::MeasurementError;
use crate::system::cpu::CpuSnapshot;
use crate::system::lister::parse::RowFormat;

const PROC_STAT: &str = "/proc/stat";

pub struct Platform;

impl PlatformExtensions for Platform {
    fn cpu_times() -> Result<CpuSnapshot, MeasurementError> {
        let contents = std::fs::read_to_string(PROC_STAT).map_err(|source| {
            MeasurementError::Read {
                path: PROC_STAT,
                source,
            }
        })?;
        parse_proc_stat(&contents, super::clock_ticks_per_second())
    }

    fn listing_command() -> Option<ListingCommand> {
        Some(ListingCommand {
            program: "ps",
            args: &["aux", "--sort=-pcpu"],
            format: RowFormat::PsAux,
        })
    }
}

/// Read the aggregate `cpu ` line of /proc/stat, converting ticks to seconds.
///
/// Kernels older than 2.6.33 stop before guest_nice (and older ones before
/// steal/guest); missing trailing counters read as 0.
fn parse_proc_stat(contents: &str, ticks_per_second: f64) -> Result<CpuSnapshot, MeasurementError> {
    let line = contents
        .lines()
        .find(|line| line.starts_with("cpu "))
        .ok_or_else(|| MeasurementError::Parse("no aggregate cpu line in /proc/stat".into()))?;

    let counters = line
        .split_whitespace()
        .skip(1)
        .map(|field| {
            field.parse::<u64>().map_err(|e| {
                MeasurementError::Parse(format!("unable to parse '{field}' in /proc/stat: {e}"))
            })
        })
        .collect::<Result<Vec<u64>, _>>()?;

    if counters.len() < 4 {
        return Err(MeasurementError::Parse(format!(
            "cpu line too short: expected at least 4 counters, got {}",
            counters.len()
        )));
    }

    let secs = |idx: usize| counters.get(idx).copied().unwrap_or(0) as f64 / ticks_per_second;
    Ok(CpuSnapshot {
        user: secs(0),
        nice: secs(1),
        system: secs(2),
        idle: secs(3),
        iowait: secs(4),
        irq: secs(5),
        softirq: secs(6),
        steal: secs(7),
        guest: secs(8),
        guest_nice: secs(9),
    })
}
