use std::thread;
use std::time::Duration;

use crate::error::MeasurementError;

/// Cumulative CPU time, in seconds, spent in each category since boot.
///
/// Aggregated over every core of the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CpuSnapshot {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    pub nice: f64,
    pub iowait: f64,
    pub irq: f64,
    pub softirq: f64,
    pub steal: f64,
    pub guest: f64,
    pub guest_nice: f64,
}

impl CpuSnapshot {
    pub fn total(&self) -> f64 {
        self.user
            + self.system
            + self.idle
            + self.nice
            + self.iowait
            + self.irq
            + self.softirq
            + self.steal
            + self.guest
            + self.guest_nice
    }
}

/// Share of the sampled window spent in each category, in percent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CpuUtilization {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    pub nice: f64,
    pub iowait: f64,
    pub irq: f64,
    pub softirq: f64,
    pub steal: f64,
    pub guest: f64,
    pub guest_nice: f64,
    /// `100 - idle`, the value compared against thresholds.
    pub used: f64,
}

impl CpuUtilization {
    /// Every category keyed by its perf-data name, in reporting order.
    pub fn categories(&self) -> [(&'static str, f64); 10] {
        [
            ("cpu_idle", self.idle),
            ("cpu_system", self.system),
            ("cpu_user", self.user),
            ("cpu_nice", self.nice),
            ("cpu_iowait", self.iowait),
            ("cpu_irq", self.irq),
            ("cpu_softirq", self.softirq),
            ("cpu_steal", self.steal),
            ("cpu_guest", self.guest),
            ("cpu_guestnice", self.guest_nice),
        ]
    }

    pub fn category_sum(&self) -> f64 {
        self.categories().iter().map(|(_, pct)| pct).sum()
    }
}

/// Derive per-category percentages from two snapshots of the same host.
///
/// Fails when the counters did not advance between `start` and `end`.
/// Categories that went backwards under counter jitter are clamped to 0.
pub fn compute_utilization(
    start: &CpuSnapshot,
    end: &CpuSnapshot,
) -> Result<CpuUtilization, MeasurementError> {
    let total_delta = end.total() - start.total();
    if total_delta.is_nan() || total_delta <= 0.0 {
        return Err(MeasurementError::NoElapsedTime(total_delta));
    }

    let pct = |name: &str, start: f64, end: f64| {
        let pct = (end - start) / total_delta * 100.0;
        if pct < 0.0 {
            tracing::warn!(category = name, pct, "CPU counter went backwards, clamping to 0");
            0.0
        } else {
            pct
        }
    };

    let idle = pct("idle", start.idle, end.idle);
    let utilization = CpuUtilization {
        user: pct("user", start.user, end.user),
        system: pct("system", start.system, end.system),
        idle,
        nice: pct("nice", start.nice, end.nice),
        iowait: pct("iowait", start.iowait, end.iowait),
        irq: pct("irq", start.irq, end.irq),
        softirq: pct("softirq", start.softirq, end.softirq),
        steal: pct("steal", start.steal, end.steal),
        guest: pct("guest", start.guest, end.guest),
        guest_nice: pct("guest_nice", start.guest_nice, end.guest_nice),
        used: 100.0 - idle,
    };
    tracing::debug!(total_delta, used = utilization.used, "computed CPU utilization");
    Ok(utilization)
}

/// Something that can read the host's cumulative CPU counters.
pub trait CpuTimesSource {
    fn snapshot(&mut self) -> Result<CpuSnapshot, MeasurementError>;
}

impl<T: CpuTimesSource + ?Sized> CpuTimesSource for &mut T {
    fn snapshot(&mut self) -> Result<CpuSnapshot, MeasurementError> {
        (**self).snapshot()
    }
}

/// Reads the counters of the host this binary runs on.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostCpuTimes;

impl CpuTimesSource for HostCpuTimes {
    fn snapshot(&mut self) -> Result<CpuSnapshot, MeasurementError> {
        super::platform::read_cpu_times()
    }
}

pub struct CpuSampler<S> {
    source: S,
    interval: Duration,
}

impl<S: CpuTimesSource> CpuSampler<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        CpuSampler { source, interval }
    }

    /// Snapshot, block for the whole interval, snapshot again.
    pub fn sample(&mut self) -> Result<CpuUtilization, MeasurementError> {
        let start = self.source.snapshot()?;
        tracing::debug!(interval = ?self.interval, "sleeping for sample interval");
        thread::sleep(self.interval);
        let end = self.source.snapshot()?;
        compute_utilization(&start, &end)
    }
}
