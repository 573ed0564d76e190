use std::thread;

use sysinfo::{
    MINIMUM_CPU_UPDATE_INTERVAL, ProcessRefreshKind, ProcessesToUpdate, System, ThreadKind,
};

use super::ProcessLister;
use crate::error::AcquisitionError;
use crate::system::platform;
use crate::system::process::ProcessSample;

/// Queries each process's CPU accounting through sysinfo.
///
/// Per-process usage is the share of CPU time consumed between two
/// refreshes, so the lister has to observe the process table twice.
pub struct DirectLister {
    sys: System,
    primed: bool,
}

impl Default for DirectLister {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectLister {
    pub fn new() -> Self {
        DirectLister {
            sys: System::new(),
            primed: false,
        }
    }

    fn refresh(&mut self) {
        let _span = tracing::debug_span!("direct_lister.refresh").entered();

        // Exited processes are dropped here, so a PID that vanished between
        // the two refreshes never reaches the ranking.
        let count = self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cpu(),
        );
        tracing::trace!(count, "refreshed process table");
    }
}

impl ProcessLister for DirectLister {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn prime(&mut self) -> Result<(), AcquisitionError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(AcquisitionError::UnsupportedPlatform(platform::os_name()));
        }
        self.refresh();
        self.primed = true;
        Ok(())
    }

    fn list(&mut self) -> Result<Vec<ProcessSample>, AcquisitionError> {
        if !self.primed {
            self.prime()?;
            thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
        }
        self.refresh();

        let mut samples: Vec<ProcessSample> = self
            .sys
            .processes()
            .iter()
            .filter(|(_, process)| !is_userland_thread(process.thread_kind()))
            .map(|(pid, process)| {
                ProcessSample::new(
                    pid.as_u32(),
                    process.cpu_usage(),
                    process.name().to_string_lossy(),
                )
            })
            .collect();
        // The process map has no meaningful order; use PID order as the
        // discovery order ties fall back on.
        samples.sort_unstable_by_key(|s| s.pid);
        Ok(samples)
    }
}

/// Linux lists every task of a process under /proc; those entries are
/// threads of a process already in the table. Kernel threads are processes
/// in their own right and stay.
fn is_userland_thread(kind: Option<ThreadKind>) -> bool {
    matches!(kind, Some(ThreadKind::Userland))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_this_process_without_priming() {
        let mut lister = DirectLister::new();
        let samples = lister.list().unwrap();
        let me = std::process::id();
        assert!(samples.iter().any(|s| s.pid == me));
        assert!(samples.iter().all(|s| s.cpu_percent >= 0.0));
        assert!(samples.windows(2).all(|w| w[0].pid < w[1].pid));
    }

    #[test]
    fn primed_listing_does_not_reprime() {
        let mut lister = DirectLister::default();
        lister.prime().unwrap();
        assert!(lister.primed);
        assert!(!lister.list().unwrap().is_empty());
    }

    #[test]
    fn only_userland_threads_are_filtered() {
        assert!(is_userland_thread(Some(ThreadKind::Userland)));
        assert!(!is_userland_thread(Some(ThreadKind::Kernel)));
        assert!(!is_userland_thread(None));
    }

    #[test]
    fn kernel_threads_are_listed() {
        let mut sys = System::new();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );
        let kernel: Vec<u32> = sys
            .processes()
            .iter()
            .filter(|(_, p)| matches!(p.thread_kind(), Some(ThreadKind::Kernel)))
            .map(|(pid, _)| pid.as_u32())
            .collect();

        let listed: Vec<u32> = DirectLister::new()
            .list()
            .unwrap()
            .iter()
            .map(|s| s.pid)
            .collect();
        // Short-lived kworkers may exit in between; the rest must survive.
        let missing = kernel.iter().filter(|pid| !listed.contains(pid)).count();
        assert!(
            kernel.is_empty() || missing < kernel.len(),
            "all {} kernel threads were dropped",
            kernel.len()
        );
    }
}
