use crate::error::MeasurementError;
use crate::system::cpu::CpuSnapshot;
use crate::system::lister::parse::RowFormat;

/// An OS utility that prints per-process CPU usage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListingCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
    pub format: RowFormat,
}

pub trait PlatformExtensions {
    fn cpu_times() -> Result<CpuSnapshot, MeasurementError>;
    fn listing_command() -> Option<ListingCommand>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
mod unsupported;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
use unsupported as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn read_cpu_times() -> Result<CpuSnapshot, MeasurementError> {
    platform_impl::Platform::cpu_times()
}

pub fn listing_command() -> Option<ListingCommand> {
    platform_impl::Platform::listing_command()
}

pub fn os_name() -> &'static str {
    std::env::consts::OS
}

/// USER_HZ, the unit of the kernel's tick counters.
#[cfg(any(target_os = "linux", target_os = "macos"))]
fn clock_ticks_per_second() -> f64 {
    // SAFETY: sysconf has no preconditions.
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if ticks > 0 { ticks as f64 } else { 100.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrappers_do_not_panic_on_this_host() {
        let _ = read_cpu_times();
        let _ = listing_command();
        assert!(!os_name().is_empty());
    }

    #[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
    #[test]
    fn supported_hosts_have_counters_and_a_listing_command() {
        let snapshot = read_cpu_times().expect("cpu counters");
        assert!(snapshot.total() > 0.0);
        assert!(listing_command().is_some());
    }
}
