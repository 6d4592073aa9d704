use anyhow::{Context, Result};
use azmon_errors::ConfigError;
use azmon_options::ApplicationInsightsOptions;
use serde_json::{Value, json};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{builder::OptionsBuilder, validation::validate_sampling_ratio};

/// Environment variables the loader reads.
pub mod env_vars {
    /// Path to a JSON (or `.toml`) configuration file.
    pub const CONFIGURATION_FILE: &str = "APPLICATIONINSIGHTS_CONFIGURATION_FILE";
    /// Inline JSON configuration.
    pub const CONFIGURATION_CONTENT: &str = "APPLICATIONINSIGHTS_CONFIGURATION_CONTENT";
    pub const CONNECTION_STRING: &str = "APPLICATIONINSIGHTS_CONNECTION_STRING";
}

/// Config file picked up from the working directory when no file is named.
pub const DEFAULT_CONFIG_FILE: &str = "applicationinsights.json";

/// Where to look for options besides the ones passed in code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
    /// Config file. Loading fails if it does not exist.
    pub file: Option<PathBuf>,
    /// Inline JSON, same shape as the config file.
    pub content: Option<String>,
    pub connection_string: Option<String>,
}

impl ConfigSources {
    /// Collect sources from the process environment.
    ///
    /// Falls back to [`DEFAULT_CONFIG_FILE`] in the working directory when
    /// `APPLICATIONINSIGHTS_CONFIGURATION_FILE` is unset and that file exists.
    pub fn from_env() -> Self {
        let file = non_empty_env(env_vars::CONFIGURATION_FILE)
            .map(PathBuf::from)
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            });

        Self {
            file,
            content: non_empty_env(env_vars::CONFIGURATION_CONTENT),
            connection_string: non_empty_env(env_vars::CONNECTION_STRING),
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Load options from a config file. `.toml` files are read as TOML,
/// everything else as JSON.
pub fn load_from_file(path: &Path) -> Result<OptionsBuilder> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()).into());
    }

    info!("Loading configuration from {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let source_name = path.display().to_string();
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let value: Value = if is_toml {
        toml::from_str(&content).map_err(|e| ConfigError::ParsingError {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?
    } else {
        serde_json::from_str(&content).map_err(|e| ConfigError::ParsingError {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?
    };

    Ok(OptionsBuilder::from_value(value, &source_name)?)
}

/// Load options from inline JSON content.
pub fn load_from_content(content: &str) -> Result<OptionsBuilder> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| ConfigError::ParsingError {
            source_name: env_vars::CONFIGURATION_CONTENT.to_string(),
            message: e.to_string(),
        })?;

    Ok(OptionsBuilder::from_value(
        value,
        env_vars::CONFIGURATION_CONTENT,
    )?)
}

/// Load and merge options from every source, lowest precedence first.
///
/// The result is not validated and carries no defaults; pass it to
/// [`crate::resolve()`] for that.
pub fn load_options(
    sources: &ConfigSources,
    programmatic: Option<&ApplicationInsightsOptions>,
) -> Result<ApplicationInsightsOptions> {
    let mut builder = OptionsBuilder::new();

    if let Some(path) = &sources.file {
        let file_layer = load_from_file(path).context("Failed to load options from file")?;
        builder.merge(file_layer);
    }

    if let Some(content) = &sources.content {
        debug!("Applying inline configuration content");
        let content_layer =
            load_from_content(content).context("Failed to load inline configuration content")?;
        builder.merge(content_layer);
    }

    if let Some(connection_string) = &sources.connection_string {
        debug!("Applying connection string from environment");
        let connection_string_layer = OptionsBuilder::from_value(
            json!({ "azureMonitorExporterConfig": { "connectionString": connection_string } }),
            env_vars::CONNECTION_STRING,
        )?;
        builder.merge(connection_string_layer);
    }

    if let Some(options) = programmatic {
        // Non-finite floats serialize as null and would be dropped by the merge
        if let Some(ratio) = options.sampling_ratio {
            validate_sampling_ratio(ratio)?;
        }
        builder.merge(OptionsBuilder::from_serializable(options)?);
    }

    builder.build()
}
