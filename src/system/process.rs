use std::cmp::Ordering;
use std::slice;

/// Default number of processes reported per check run.
pub const DEFAULT_LIMIT: usize = 10;

/// CPU usage of one process at the time of the check.
///
/// PIDs are only meaningful within a single run; the OS may reuse them.
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessSample {
    pub pid: u32,
    pub cpu_percent: f32,
    pub name: String,
}

impl ProcessSample {
    pub fn new(pid: u32, cpu_percent: f32, name: impl Into<String>) -> Self {
        ProcessSample {
            pid,
            cpu_percent,
            name: name.into(),
        }
    }
}

/// Processes ordered by CPU usage, highest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RankedProcessList {
    processes: Vec<ProcessSample>,
}

impl RankedProcessList {
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, ProcessSample> {
        self.processes.iter()
    }

    pub fn as_slice(&self) -> &[ProcessSample] {
        &self.processes
    }
}

impl<'a> IntoIterator for &'a RankedProcessList {
    type Item = &'a ProcessSample;
    type IntoIter = slice::Iter<'a, ProcessSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Keep the `limit` busiest processes.
///
/// The sort is stable, so equal usage keeps discovery order. Samples whose
/// usage is NaN carry no ranking information and are dropped.
pub fn rank_top(mut samples: Vec<ProcessSample>, limit: usize) -> RankedProcessList {
    samples.retain(|s| !s.cpu_percent.is_nan());
    samples.sort_by(|a, b| descending(a.cpu_percent, b.cpu_percent));
    samples.truncate(limit);
    RankedProcessList { processes: samples }
}

fn descending(a: f32, b: f32) -> Ordering {
    b.total_cmp(&a)
}
