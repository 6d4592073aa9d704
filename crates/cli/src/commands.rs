use anyhow::{Context, Result};
use azmon_config::{ConfigSources, ResolvedOptions, load_options, resolve};
use azmon_options::{AZURE_MONITOR_OPENTELEMETRY_VERSION, consts::env_vars};
use azmon_telemetry::{StatsbeatSnapshot, create_telemetry};
use log::{debug, info};
use std::path::Path;

use crate::cli::{Commands, OutputFormat};

/// Load options from the environment (and `config`, when given) and resolve them.
pub fn load_resolved(config: Option<&Path>) -> Result<ResolvedOptions> {
    let mut sources = ConfigSources::from_env();
    if let Some(path) = config {
        sources = sources.with_file(path);
    }
    debug!("Configuration sources: {:?}", sources);

    let options = load_options(&sources, None)?;
    resolve(options).context("Invalid configuration")
}

pub fn render_options(options: &ResolvedOptions, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(options).context("Failed to render options as JSON")
        }
        OutputFormat::Toml => {
            toml::to_string_pretty(options).context("Failed to render options as TOML")
        }
    }
}

pub fn statsbeat_report(snapshot: &StatsbeatSnapshot) -> Result<String> {
    Ok(format!(
        "feature: {} ({})\ninstrumentation: {} ({})\n{}={}",
        snapshot.feature.bits(),
        snapshot.feature,
        snapshot.instrumentation.bits(),
        snapshot.instrumentation,
        env_vars::STATSBEAT_FEATURES,
        snapshot.to_env_value()?
    ))
}

pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Show(args) => {
            let options = load_resolved(args.config.config.as_deref())?;
            println!("{}", render_options(&options, args.format)?);
        }
        Commands::Statsbeat(args) => {
            let options = load_resolved(args.config.as_deref())?;
            let telemetry =
                create_telemetry(&options).context("Failed to initialize telemetry")?;
            println!("{}", statsbeat_report(&telemetry.statsbeat())?);
            telemetry.shutdown()?;
        }
        Commands::Version => {
            info!("Azure Monitor OpenTelemetry distro");
            println!("{}", AZURE_MONITOR_OPENTELEMETRY_VERSION);
        }
    }
    Ok(())
}
