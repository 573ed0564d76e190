use super::{ListingCommand, PlatformExtensions};
use crate::error::MeasurementError;
use crate::system::cpu::CpuSnapshot;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn cpu_times() -> Result<CpuSnapshot, MeasurementError> {
        Err(MeasurementError::UnsupportedPlatform(super::os_name()))
    }

    fn listing_command() -> Option<ListingCommand> {
        None
    }
}
