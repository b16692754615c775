//! CLI argument parsing definitions

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use schedview_types::ScheduleSelector;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Inspect schedules over GraphQL", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error) or a filter directive
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// GraphQL endpoint URL, overrides the configuration
    #[arg(long, value_name = "URL", global = true)]
    pub endpoint: Option<String>,

    /// Output format, overrides the configuration
    #[arg(long, value_enum, value_name = "FORMAT", global = true)]
    pub output: Option<OutputArg>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a schedule with its history and upcoming ticks
    Show {
        #[command(flatten)]
        selector: SelectorArgs,

        /// Also save the raw response to this file
        #[arg(long, value_name = "PATH")]
        record: Option<PathBuf>,
    },

    /// Show the scheduler configured on the instance
    Scheduler {
        #[command(flatten)]
        selector: SelectorArgs,
    },

    /// Render a saved response without contacting the endpoint
    Decode {
        /// Response file, either a {data, errors} envelope or the bare data object
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

/// Identifies one schedule
#[derive(Args, Debug, Clone, Default)]
pub struct SelectorArgs {
    /// Selector in the form schedule@repository@location
    #[arg(long, value_name = "SELECTOR", conflicts_with_all = ["location", "repository", "schedule"])]
    pub selector: Option<String>,

    /// Repository location name
    #[arg(long, value_name = "NAME")]
    pub location: Option<String>,

    /// Repository name
    #[arg(long, value_name = "NAME")]
    pub repository: Option<String>,

    /// Schedule name
    #[arg(long, value_name = "NAME")]
    pub schedule: Option<String>,
}

impl SelectorArgs {
    pub fn to_selector(&self) -> Result<ScheduleSelector> {
        if let Some(selector) = &self.selector {
            return Ok(selector.parse()?);
        }

        match (&self.location, &self.repository, &self.schedule) {
            (Some(location), Some(repository), Some(schedule)) => {
                Ok(ScheduleSelector::new(location, repository, schedule))
            }
            _ => Err(anyhow!(
                "A schedule is required: pass --selector schedule@repository@location \
                 or all of --location, --repository and --schedule"
            )),
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        #[arg(long, value_name = "PATH")]
        config_file: PathBuf,
    },

    /// Generate a sample configuration file
    Generate {
        /// Where to write the sample file
        #[arg(long, value_name = "PATH")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration in use
    Show {
        /// Path to configuration file (optional, uses default loading logic)
        #[arg(long, value_name = "PATH")]
        config_file: Option<PathBuf>,

        /// Output format: yaml, json
        #[arg(long, value_name = "FORMAT", default_value = "yaml")]
        format: String,
    },
}
