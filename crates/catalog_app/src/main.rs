mod platform;

use std::path::PathBuf;

use catalog_logging::LogDestination;
use clap::{Parser, ValueEnum};

use platform::{ConfigOverrides, DEFAULT_CONFIG_FILE};

/// Terminal admin console for the product catalog importer.
#[derive(Debug, Parser)]
#[command(name = "catalog_console", version, about)]
struct Cli {
    /// RON configuration file; a missing file means built-in defaults.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Backend root URL, overriding the configuration file.
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Where log records go.
    #[arg(long, value_enum, value_name = "TARGET")]
    log: Option<LogTarget>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogTarget {
    File,
    Terminal,
    Both,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::File => LogDestination::File,
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::Both => LogDestination::Both,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        base_url: cli.base_url,
        log_destination: cli.log.map(LogDestination::from),
    };
    platform::run_app(&cli.config, overrides)
}
