//! Command handlers

use anyhow::{anyhow, Context, Result};
use schedview_client::{decode_response, ClientConfig, HttpScheduleClient, ScheduleClient};
use schedview_config::domains::output::OutputFormat;
use schedview_config::{ConfigLoader, SchedviewConfig};
use schedview_types::{ScheduleRootQuery, ScheduleSelector};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, error, info};

use crate::render::{RenderOptions, Renderer};

/// Fetch and render a full schedule
pub async fn handle_show(
    config: &SchedviewConfig,
    selector: &ScheduleSelector,
    record: Option<&Path>,
) -> Result<()> {
    let client = http_client(config)?;
    let root = fetch_schedule(&client, selector, record).await?;
    print_root(&mut io::stdout().lock(), config, &root)
}

/// Fetch and render the scheduler status only
pub async fn handle_scheduler(config: &SchedviewConfig, selector: &ScheduleSelector) -> Result<()> {
    let client = http_client(config)?;
    let root = fetch_root(&client, selector).await?;
    print_scheduler(&mut io::stdout().lock(), config, &root)
}

/// Render a saved response file
pub fn handle_decode(config: &SchedviewConfig, file: &Path) -> Result<()> {
    let root = decode_file(file)?;
    print_root(&mut io::stdout().lock(), config, &root)
}

fn http_client(config: &SchedviewConfig) -> Result<HttpScheduleClient> {
    let client = HttpScheduleClient::new(&ClientConfig::from(config))
        .context("Failed to create GraphQL client")?;
    debug!("GraphQL client ready for {}", client.endpoint());
    Ok(client)
}

pub async fn fetch_root(
    client: &dyn ScheduleClient,
    selector: &ScheduleSelector,
) -> Result<ScheduleRootQuery> {
    info!("Fetching schedule {}", selector);
    client
        .fetch_schedule_root(selector)
        .await
        .with_context(|| format!("Failed to fetch schedule {}", selector))
}

/// Fetch over HTTP, saving the raw response first when `record` is set
pub async fn fetch_schedule(
    client: &HttpScheduleClient,
    selector: &ScheduleSelector,
    record: Option<&Path>,
) -> Result<ScheduleRootQuery> {
    let Some(path) = record else {
        return fetch_root(client, selector).await;
    };

    let raw = client
        .fetch_raw(selector)
        .await
        .with_context(|| format!("Failed to fetch schedule {}", selector))?;
    write_recording(path, &raw)?;
    println!("Response recorded to: {}", path.display());

    decode_response(raw).with_context(|| format!("Failed to decode schedule {}", selector))
}

fn write_recording(path: &Path, raw: &JsonValue) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create recording directory")?;
    }
    let content = serde_json::to_string_pretty(raw).context("Failed to serialize response")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write recording to {}", path.display()))
}

pub fn decode_file(file: &Path) -> Result<ScheduleRootQuery> {
    info!("Decoding response from {}", file.display());
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read response file {}", file.display()))?;
    let value: JsonValue = serde_json::from_str(&content)
        .with_context(|| format!("Response file {} is not valid JSON", file.display()))?;
    decode_response(value)
        .with_context(|| format!("Failed to decode response file {}", file.display()))
}

pub fn print_root<W: Write>(
    out: &mut W,
    config: &SchedviewConfig,
    root: &ScheduleRootQuery,
) -> Result<()> {
    match config.output.format {
        OutputFormat::Json => print_json(out, root),
        OutputFormat::Table => {
            let renderer = Renderer::new(RenderOptions::from(&config.output));
            renderer
                .render_root(out, root)
                .context("Failed to write output")
        }
    }
}

pub fn print_scheduler<W: Write>(
    out: &mut W,
    config: &SchedviewConfig,
    root: &ScheduleRootQuery,
) -> Result<()> {
    match config.output.format {
        OutputFormat::Json => print_json(out, &root.scheduler),
        OutputFormat::Table => {
            let renderer = Renderer::new(RenderOptions::from(&config.output));
            renderer
                .render_scheduler(out, &root.scheduler)
                .context("Failed to write output")
        }
    }
}

fn print_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("Failed to serialize output")?;
    writeln!(out).context("Failed to write output")
}

/// Handle configuration validation
pub fn handle_config_validate(config_file: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", config_file);

    if !config_file.exists() {
        return Err(anyhow!("Configuration file not found: {:?}", config_file));
    }

    match ConfigLoader::new().from_file(config_file) {
        Ok(_config) => {
            println!("✅ Configuration file is valid");
            info!("Configuration validation passed");
            Ok(())
        }
        Err(e) => {
            println!("❌ Configuration validation failed: {}", e);
            error!("Configuration validation failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handle configuration generation
pub fn handle_config_generate(output: &Path, force: bool) -> Result<()> {
    info!("Generating configuration at: {:?}", output);

    if output.exists() && !force {
        return Err(anyhow!(
            "Output file already exists: {:?}. Use --force to overwrite.",
            output
        ));
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    let content = SchedviewConfig::generate_sample().context("Failed to generate configuration")?;
    fs::write(output, content).context("Failed to write configuration file")?;

    println!("✅ Configuration generated at: {:?}", output);
    println!("🔧 Validate with: schedview config validate --config-file {:?}", output);
    Ok(())
}

/// Handle configuration display
pub fn handle_config_show(
    config: &SchedviewConfig,
    config_file: Option<&Path>,
    format: &str,
) -> Result<()> {
    let loaded;
    let config = match config_file {
        Some(path) => {
            loaded = ConfigLoader::new()
                .from_file(path)
                .with_context(|| format!("Failed to load configuration from {:?}", path))?;
            &loaded
        }
        None => config,
    };

    let rendered = match format.to_lowercase().as_str() {
        "yaml" | "yml" => config.to_redacted_yaml().context("Failed to serialize to YAML")?,
        "json" => config.to_redacted_json().context("Failed to serialize to JSON")?,
        _ => {
            return Err(anyhow!(
                "Unknown output format: {}. Valid formats: yaml, json",
                format
            ));
        }
    };

    println!("{}", rendered.trim_end());
    Ok(())
}
