use std::path::{Path, PathBuf};

mod generate;
mod join;
mod merge;
mod summary;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use generate::Generate;
use join::Join;
use merge::Merge;
use summary::Summary;
use testplan::Config;

/// Config file picked up from the working directory when `--config` is not
/// given.
const DEFAULT_CONFIG: &str = "testplan.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML config file (defaults to ./testplan.toml, if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = load_config(self.config.as_deref(), Path::new(DEFAULT_CONFIG))?;
        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Loads the config file.
///
/// An explicit path must exist and parse. The default file is optional.
fn load_config(explicit: Option<&Path>, default: &Path) -> anyhow::Result<Config> {
    let path = match explicit {
        Some(path) => path,
        None if default.exists() => default,
        None => {
            tracing::debug!("no {} found, using default config", default.display());
            return Ok(Config::default());
        }
    };

    Config::load(path)
        .map_err(|e| anyhow::anyhow!(e))
        .with_context(|| format!("failed to load config from {}", path.display()))
}

/// Picks the path given on the command line, falling back to the config.
fn input_path(
    flag: Option<PathBuf>,
    configured: Option<&PathBuf>,
    name: &str,
) -> anyhow::Result<PathBuf> {
    flag.or_else(|| configured.cloned()).with_context(|| {
        format!("no {name} given; pass --{name} or set `{}` in the config", name.replace('-', "_"))
    })
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Generate coverage rules from one or more source test plans
    ///
    /// Plans are merged before generation.
    Generate(Generate),

    /// Merge several source test plans into one
    Merge(Merge),

    /// Show how flat configs join with build metadata
    Join(Join),

    /// Render a text summary of a coverage rule document
    Summary(Summary),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Generate(command) => command.run(config)?,
            Self::Merge(command) => command.run()?,
            Self::Join(command) => command.run(config)?,
            Self::Summary(command) => command.run(config)?,
        }
        Ok(())
    }
}
