use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::consts::SERVICE_NAME_ATTRIBUTE;

/// Azure Monitor OpenTelemetry options.
///
/// Root configuration handed to the distro initializer at startup. Every
/// field is optional; absent fields take the initializer's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureMonitorOpenTelemetryOptions {
    /// Azure Monitor exporter configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_monitor_exporter_config: Option<AzureMonitorExporterOptions>,

    /// OpenTelemetry resource attached to every signal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceOptions>,

    /// The rate of telemetry items tracked that should be transmitted
    /// (default 1.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_ratio: Option<f64>,

    /// Instrumentations included with the distro (azureSdk, http, mongoDb,
    /// mySql, postgreSql, redis, redis4).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrumentation_options: Option<InstrumentationOptions>,
}

/// Azure Monitor exporter configuration.
///
/// The exporter itself lives elsewhere; fields it understands that are not
/// listed here are kept in `extra` and passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureMonitorExporterOptions {
    /// `InstrumentationKey=...;IngestionEndpoint=...` connection string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,

    /// Directory used to persist telemetry that could not be sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_directory: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_offline_storage: Option<bool>,

    /// Audience used when authenticating with Azure Active Directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aad_audience: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Resource attributes describing the monitored entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceOptions {
    pub attributes: BTreeMap<String, String>,
}

impl ResourceOptions {
    pub fn new(attributes: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            attributes: attributes.into_iter().collect(),
        }
    }

    /// The `service.name` attribute, if set.
    pub fn service_name(&self) -> Option<&str> {
        self.attributes
            .get(SERVICE_NAME_ATTRIBUTE)
            .map(String::as_str)
    }
}

/// Instrumentations configuration, one optional entry per integration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InstrumentationOptions {
    /// Azure SDK instrumentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_sdk: Option<InstrumentationConfig>,
    /// HTTP instrumentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<InstrumentationConfig>,
    /// MongoDB instrumentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mongo_db: Option<InstrumentationConfig>,
    /// MySQL instrumentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_sql: Option<InstrumentationConfig>,
    /// PostgreSQL instrumentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postgre_sql: Option<InstrumentationConfig>,
    /// Redis (v3 client) instrumentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis: Option<InstrumentationConfig>,
    /// Redis (v4 client) instrumentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis4: Option<InstrumentationConfig>,
}

/// Configuration for a single instrumentation library.
///
/// Only `enabled` is interpreted by the distro; everything else belongs to the
/// instrumentation and is carried in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InstrumentationConfig {
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Default::default()
        }
    }
}
