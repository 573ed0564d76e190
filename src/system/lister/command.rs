use std::collections::HashMap;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::ProcessLister;
use super::parse::{self, CpuColumn, ListingRow};
use crate::error::AcquisitionError;
use crate::system::platform::{self, ListingCommand};
use crate::system::process::ProcessSample;

/// Shortest window over which cumulative CPU times are compared. `tasklist`
/// reports whole seconds.
const MINIMUM_CPU_TIME_WINDOW: Duration = Duration::from_secs(1);

/// Runs the host's process-listing utility and parses what it prints.
///
/// Utilities that only report cumulative CPU time are read twice, once when
/// primed and once when listed, and usage is the time consumed in between.
pub struct CommandLister {
    command: Option<ListingCommand>,
    baseline: Option<Baseline>,
}

/// Cumulative CPU seconds per PID at the start of a window.
struct Baseline {
    taken: Instant,
    cpu_secs: HashMap<u32, f64>,
}

impl Baseline {
    fn capture(rows: Vec<ListingRow>) -> Self {
        Baseline {
            taken: Instant::now(),
            cpu_secs: rows.into_iter().map(|row| (row.pid, row.cpu)).collect(),
        }
    }
}

impl CommandLister {
    /// The listing utility of the running OS, if it has one.
    pub fn for_host() -> Self {
        CommandLister {
            command: platform::listing_command(),
            baseline: None,
        }
    }

    pub fn new(command: ListingCommand) -> Self {
        CommandLister {
            command: Some(command),
            baseline: None,
        }
    }

    fn command(&self) -> Result<ListingCommand, AcquisitionError> {
        self.command
            .ok_or_else(|| AcquisitionError::UnsupportedPlatform(platform::os_name()))
    }
}

impl ProcessLister for CommandLister {
    fn name(&self) -> &'static str {
        "command"
    }

    fn prime(&mut self) -> Result<(), AcquisitionError> {
        let command = self.command()?;
        if command.format.cpu_column() == CpuColumn::CumulativeSeconds {
            self.baseline = Some(Baseline::capture(run(&command)?));
        }
        Ok(())
    }

    fn list(&mut self) -> Result<Vec<ProcessSample>, AcquisitionError> {
        let command = self.command()?;
        match command.format.cpu_column() {
            CpuColumn::Percent => Ok(run(&command)?
                .into_iter()
                .map(|row| ProcessSample::new(row.pid, row.cpu as f32, row.name))
                .collect()),
            CpuColumn::CumulativeSeconds => {
                let baseline = match self.baseline.take() {
                    Some(baseline) => baseline,
                    None => {
                        let baseline = Baseline::capture(run(&command)?);
                        thread::sleep(MINIMUM_CPU_TIME_WINDOW);
                        baseline
                    }
                };
                let rows = run(&command)?;
                let window = baseline.taken.elapsed();
                Ok(usage_over_window(&baseline.cpu_secs, rows, window))
            }
        }
    }
}

fn run(command: &ListingCommand) -> Result<Vec<ListingRow>, AcquisitionError> {
    tracing::debug!(
        program = command.program,
        args = ?command.args,
        "running listing command"
    );
    let output = Command::new(command.program)
        .args(command.args)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| AcquisitionError::Spawn {
            program: command.program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(AcquisitionError::CommandFailed {
            program: command.program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let rows = parse::parse_rows(&stdout, command.format);
    tracing::debug!(
        lines = stdout.lines().count(),
        parsed = rows.len(),
        "parsed listing command output"
    );
    Ok(rows)
}

/// Turn cumulative CPU seconds into percent of one core over `window`,
/// the same unit `ps` and sysinfo report.
///
/// A PID missing from `before`, or whose counter went backwards because the
/// PID was reused, started inside the window and is charged its whole time.
fn usage_over_window(
    before: &HashMap<u32, f64>,
    rows: Vec<ListingRow>,
    window: Duration,
) -> Vec<ProcessSample> {
    let secs = window.as_secs_f64();
    rows.into_iter()
        .map(|row| {
            let consumed = match before.get(&row.pid) {
                Some(&start) if start <= row.cpu => row.cpu - start,
                _ => row.cpu,
            };
            let pct = if secs > 0.0 {
                consumed / secs * 100.0
            } else {
                0.0
            };
            ProcessSample::new(row.pid, pct as f32, row.name)
        })
        .collect()
}
