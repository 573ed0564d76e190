pub mod command;
pub mod direct;
pub mod parse;

use serde::Deserialize;

use crate::error::AcquisitionError;
use crate::system::process::{ProcessSample, RankedProcessList, rank_top};

pub use command::CommandLister;
pub use direct::DirectLister;

/// Source of per-process CPU usage.
pub trait ProcessLister {
    fn name(&self) -> &'static str;

    /// Start observing the process table.
    ///
    /// Called before the CPU sampler sleeps, so listers that measure usage
    /// over an interval can reuse the sampler's window.
    fn prime(&mut self) -> Result<(), AcquisitionError> {
        Ok(())
    }

    /// Every live process, unranked, in discovery order.
    fn list(&mut self) -> Result<Vec<ProcessSample>, AcquisitionError>;
}

impl<T: ProcessLister + ?Sized> ProcessLister for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn prime(&mut self) -> Result<(), AcquisitionError> {
        (**self).prime()
    }

    fn list(&mut self) -> Result<Vec<ProcessSample>, AcquisitionError> {
        (**self).list()
    }
}

/// How process CPU usage is acquired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Query per-process CPU accounting directly
    #[default]
    Direct,
    /// Run the OS process-listing utility and parse its output
    Command,
}

pub fn build_lister(strategy: Strategy) -> Box<dyn ProcessLister> {
    match strategy {
        Strategy::Direct => Box::new(DirectLister::new()),
        Strategy::Command => Box::new(CommandLister::for_host()),
    }
}

pub fn top_processes<L: ProcessLister + ?Sized>(
    lister: &mut L,
    limit: usize,
) -> Result<RankedProcessList, AcquisitionError> {
    let samples = lister.list()?;
    let seen = samples.len();
    let ranked = rank_top(samples, limit);
    tracing::debug!(lister = lister.name(), seen, kept = ranked.len(), "ranked processes");
    Ok(ranked)
}
