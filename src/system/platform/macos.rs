use super::{ListingCommand, PlatformExtensions};
use crate::error::MeasurementError;
use crate::system::cpu::CpuSnapshot;
use crate::system::lister::parse::RowFormat;

pub struct Platform;

impl PlatformExtensions for Platform {
    // mach_host_self is deprecated in libc in favour of the mach2 crate.
    #[allow(deprecated)]
    fn cpu_times() -> Result<CpuSnapshot, MeasurementError> {
        // SAFETY: host_cpu_load_info is plain data and the count matches its size.
        let (ret, info) = unsafe {
            let mut info = std::mem::zeroed::<libc::host_cpu_load_info>();
            let mut count = libc::HOST_CPU_LOAD_INFO_COUNT;
            let ret = libc::host_statistics(
                libc::mach_host_self(),
                libc::HOST_CPU_LOAD_INFO,
                &mut info as *mut libc::host_cpu_load_info as libc::host_info_t,
                &mut count,
            );
            (ret, info)
        };
        if ret != libc::KERN_SUCCESS {
            return Err(MeasurementError::Unavailable(format!(
                "host_statistics(HOST_CPU_LOAD_INFO) returned {ret}"
            )));
        }

        let hz = super::clock_ticks_per_second();
        let secs = |state: libc::c_int| info.cpu_ticks[state as usize] as f64 / hz;
        // Mach only tracks these four states.
        Ok(CpuSnapshot {
            user: secs(libc::CPU_STATE_USER),
            system: secs(libc::CPU_STATE_SYSTEM),
            idle: secs(libc::CPU_STATE_IDLE),
            nice: secs(libc::CPU_STATE_NICE),
            ..CpuSnapshot::default()
        })
    }

    fn listing_command() -> Option<ListingCommand> {
        // BSD ps has no --sort; -r orders by CPU usage.
        Some(ListingCommand {
            program: "ps",
            args: &["aux", "-r"],
            format: RowFormat::PsAux,
        })
    }
}
