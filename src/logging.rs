use color_eyre::eyre::{Result, eyre};
use tracing::Level;

/// Map `-v` occurrences to a level. Quiet by default: the agent reads stdout
/// and usually discards stderr.
pub fn level_for_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install a global subscriber writing to stderr.
pub fn init_tracing(verbosity: u8, json: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(level_for_verbosity(verbosity))
        .with_writer(std::io::stderr);

    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for_verbosity(0), Level::WARN);
        assert_eq!(level_for_verbosity(1), Level::INFO);
        assert_eq!(level_for_verbosity(2), Level::DEBUG);
        assert_eq!(level_for_verbosity(9), Level::TRACE);
    }
}
