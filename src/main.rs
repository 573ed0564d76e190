use std::io::{Write, stdout};
use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;
use color_eyre::Result;
use cpu_process_profiler::check::{self, PLUGIN_NAME};
use cpu_process_profiler::config::{self, CheckConfig, Overrides};
use cpu_process_profiler::error::{CheckError, ConfigError};
use cpu_process_profiler::logging;
use cpu_process_profiler::system::cpu::HostCpuTimes;
use cpu_process_profiler::system::lister::{Strategy, build_lister};

#[derive(Parser, Debug)]
#[command(
    name = "cpu-process-profiler",
    version,
    about = "Check overall CPU usage and report the top CPU-consuming processes",
    after_help = "Exit status: 0 OK, 1 WARNING (including bad arguments), 2 CRITICAL.

Example:

    cpu-process-profiler --warning 75 --critical 90 --sample-interval 2"
)]
struct Cli {
    /// Critical threshold for overall CPU usage, in percent
    #[arg(short, long)]
    critical: Option<f64>,

    /// Warning threshold for overall CPU usage, in percent
    #[arg(short, long)]
    warning: Option<f64>,

    /// Length of the sample interval in seconds
    #[arg(short, long = "sample-interval")]
    sample_interval: Option<u64>,

    /// Number of processes to report
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// How per-process CPU usage is acquired
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log to stderr; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log as JSON lines
    #[arg(long, default_value_t = false)]
    log_json: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            critical: self.critical,
            warning: self.warning,
            sample_interval: self.sample_interval,
            limit: self.limit,
            strategy: self.strategy,
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let rendered = err.to_string();
                let first_line = rendered.lines().next().unwrap_or_default();
                let message = first_line.trim_start_matches("error: ").to_string();
                fail(&ConfigError::Arguments(message).into())
            }
        },
    };
    logging::init_tracing(cli.verbose, cli.log_json)?;

    let config = match load_config_for_cli(&cli) {
        Ok(config) => config,
        Err(err) => fail(&err.into()),
    };
    tracing::debug!(?config, "resolved configuration");

    let mut lister = build_lister(config.strategy);
    match check::run_check(&config, HostCpuTimes, &mut lister) {
        Ok(report) => {
            let mut out = stdout().lock();
            write!(out, "{report}")?;
            out.flush()?;
            report.status.exit()
        }
        Err(err) => fail(&err),
    }
}

fn load_config_for_cli(cli: &Cli) -> std::result::Result<CheckConfig, ConfigError> {
    let file = match &cli.config {
        Some(path) => config::load_config_from_path(path)?,
        None => config::load_config()?,
    };
    CheckConfig::resolve(file, &cli.overrides())
}

fn fail(err: &CheckError) -> ! {
    tracing::error!(error = %err, "{PLUGIN_NAME} failed");
    println!("{}", check::render_failure(err));
    err.status().exit()
}
