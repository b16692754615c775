use anyhow::{Context, Result};
use clap::Parser;
use schedview_config::domains::output::OutputFormat;
use schedview_config::{ConfigLoader, SchedviewConfig};
use tracing::{debug, info};

mod cli;
mod commands;
mod logging;
mod render;

use cli::{Cli, Commands, ConfigCommands, OutputArg};

/// Load configuration from file or environment, then apply command line overrides
fn load_config(cli: &Cli) -> Result<SchedviewConfig> {
    let loader = ConfigLoader::new();

    let mut config = match &cli.config {
        Some(path) => loader
            .from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?,
        None => loader
            .from_env()
            .context("Failed to load configuration from environment")?,
    };

    if let Some(endpoint) = &cli.endpoint {
        config.endpoint.url = endpoint.clone();
    }
    if let Some(output) = cli.output {
        config.output.format = match output {
            OutputArg::Table => OutputFormat::Table,
            OutputArg::Json => OutputFormat::Json,
        };
    }
    if cli.no_color {
        config.output.color = false;
    }

    config
        .validate_all()
        .context("Invalid command line overrides")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = tracing::subscriber::with_default(
        logging::bootstrap_subscriber(cli.log_level.as_deref()),
        || load_config(&cli),
    )?;
    logging::init_tracing(&config.logging, cli.log_level.as_deref())?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    debug!("Using endpoint {}", config.endpoint.url);

    match &cli.command {
        Some(Commands::Show { selector, record }) => {
            let selector = selector.to_selector()?;
            info!("Showing schedule {}", selector);
            commands::handle_show(&config, &selector, record.as_deref()).await
        }
        Some(Commands::Scheduler { selector }) => {
            let selector = selector.to_selector()?;
            commands::handle_scheduler(&config, &selector).await
        }
        Some(Commands::Decode { file }) => commands::handle_decode(&config, file),
        Some(Commands::Config { config_cmd }) => match config_cmd {
            ConfigCommands::Validate { config_file } => {
                commands::handle_config_validate(config_file)
            }
            ConfigCommands::Generate { path, force } => {
                commands::handle_config_generate(path, *force)
            }
            ConfigCommands::Show {
                config_file,
                format,
            } => commands::handle_config_show(&config, config_file.as_deref(), format),
        },
        None => {
            // If no subcommand is provided, print help
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            cmd.print_help().context("Failed to print help")?;
            println!();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_overrides() {
        temp_env::with_vars_unset(["SCHEDVIEW_ENDPOINT", "SCHEDVIEW_OUTPUT_FORMAT"], || {
            let cli = Cli::try_parse_from([
                "schedview",
                "--endpoint",
                "https://dagit.example.com/graphql",
                "--output",
                "json",
                "--no-color",
                "decode",
                "--file",
                "response.json",
            ])
            .unwrap();

            let config = load_config(&cli).unwrap();
            assert_eq!(config.endpoint.url, "https://dagit.example.com/graphql");
            assert_eq!(config.output.format, OutputFormat::Json);
            assert!(!config.output.color);
        });
    }

    #[test]
    fn test_invalid_endpoint_override_is_rejected() {
        let cli = Cli::try_parse_from(["schedview", "--endpoint", "dagit:3000", "config", "show"])
            .unwrap();
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn test_config_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schedview.yaml");
        std::fs::write(&path, "output:\n  tick_limit: 3\n").unwrap();

        let cli = Cli::try_parse_from([
            "schedview",
            "--config",
            path.to_str().unwrap(),
            "config",
            "show",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.output.tick_limit, 3);
    }
}
