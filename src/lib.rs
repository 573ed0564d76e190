//! Monitoring check that samples host CPU utilization over an interval and
//! reports the processes using the most CPU.
//!
//! A run is a single measurement: [`check::run_check`] primes a
//! [`system::lister::ProcessLister`], samples CPU counters through a
//! [`system::cpu::CpuSampler`], ranks processes and picks a [`status::Status`]
//! from the configured thresholds. Nothing is kept between runs.

pub mod check;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod status;
pub mod system;
