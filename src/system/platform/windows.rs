use windows_sys::Win32::Foundation::FILETIME;
use windows_sys::Win32::System::Threading::GetSystemTimes;

use super::{ListingCommand, PlatformExtensions};
use crate::error::MeasurementError;
use crate::system::cpu::CpuSnapshot;
use crate::system::lister::parse::RowFormat;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn cpu_times() -> Result<CpuSnapshot, MeasurementError> {
        // SAFETY: the three out-pointers are valid for the duration of the call.
        unsafe {
            let mut idle = std::mem::zeroed::<FILETIME>();
            let mut kernel = std::mem::zeroed::<FILETIME>();
            let mut user = std::mem::zeroed::<FILETIME>();
            if GetSystemTimes(&mut idle, &mut kernel, &mut user) == 0 {
                return Err(MeasurementError::Unavailable(format!(
                    "GetSystemTimes failed: {}",
                    std::io::Error::last_os_error()
                )));
            }
            let idle = filetime_secs(&idle);
            // Kernel time includes idle time.
            Ok(CpuSnapshot {
                user: filetime_secs(&user),
                system: (filetime_secs(&kernel) - idle).max(0.0),
                idle,
                ..CpuSnapshot::default()
            })
        }
    }

    fn listing_command() -> Option<ListingCommand> {
        Some(ListingCommand {
            program: "tasklist",
            args: &["/v", "/fo", "csv", "/nh"],
            format: RowFormat::TasklistCsv,
        })
    }
}

/// FILETIME counts 100ns intervals.
fn filetime_secs(ft: &FILETIME) -> f64 {
    let ticks = ((ft.dwHighDateTime as u64) << 32) | ft.dwLowDateTime as u64;
    ticks as f64 / 10_000_000.0
}
