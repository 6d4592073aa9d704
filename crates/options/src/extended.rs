use azmon_errors::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::options::AzureMonitorOpenTelemetryOptions;

/// Application Insights options.
///
/// Everything [`AzureMonitorOpenTelemetryOptions`] accepts, plus the extended
/// distro settings. The base fields are embedded and flattened, so a single
/// JSON object carries both and a base-only consumer can read an extended
/// value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationInsightsOptions {
    #[serde(flatten)]
    pub base: AzureMonitorOpenTelemetryOptions,

    /// Sets the state of exception tracking (enabled by default).
    /// If true, uncaught exceptions are sent to Application Insights.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_auto_collect_exceptions: Option<bool>,

    /// Log instrumentations (console, bunyan, winston).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_instrumentation_options: Option<LogInstrumentationOptions>,

    /// OTLP trace exporter configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otlp_trace_exporter_config: Option<OtlpExporterConfig>,

    /// OTLP metric exporter configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otlp_metric_exporter_config: Option<OtlpExporterConfig>,

    /// OTLP log exporter configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otlp_log_exporter_config: Option<OtlpExporterConfig>,

    /// Sets the state of performance tracking (enabled by default).
    /// If true, performance counters are collected every second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_auto_collect_performance: Option<bool>,

    /// Extended metrics keyed by [`ExtendedMetricType`] name. Requires the
    /// native metrics collector to be available at runtime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_metrics: Option<BTreeMap<String, bool>>,
}

impl ApplicationInsightsOptions {
    pub fn base(&self) -> &AzureMonitorOpenTelemetryOptions {
        &self.base
    }

    pub fn into_base(self) -> AzureMonitorOpenTelemetryOptions {
        self.base
    }

    /// Toggle for one extended metric, if the caller set it.
    pub fn extended_metric(&self, kind: ExtendedMetricType) -> Option<bool> {
        self.extended_metrics
            .as_ref()
            .and_then(|metrics| metrics.get(kind.as_str()).copied())
    }
}

impl From<AzureMonitorOpenTelemetryOptions> for ApplicationInsightsOptions {
    fn from(base: AzureMonitorOpenTelemetryOptions) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }
}

impl AsRef<AzureMonitorOpenTelemetryOptions> for ApplicationInsightsOptions {
    fn as_ref(&self) -> &AzureMonitorOpenTelemetryOptions {
        &self.base
    }
}

impl Deref for ApplicationInsightsOptions {
    type Target = AzureMonitorOpenTelemetryOptions;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

/// Transport settings shared by the OTLP exporters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OtlpExporterNodeConfigBase {
    /// Collector endpoint, e.g. `http://localhost:4318/v1/traces`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_millis: Option<u64>,

    /// Maximum number of export requests in flight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency_limit: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<OtlpCompression>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtlpCompression {
    None,
    Gzip,
}

/// OTLP exporter options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtlpExporterConfig {
    #[serde(flatten)]
    pub base: OtlpExporterNodeConfigBase,

    /// Enable/disable the OTLP exporter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Log instrumentations, one optional toggle per logging library.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogInstrumentationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub console: Option<LogInstrumentationToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bunyan: Option<LogInstrumentationToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winston: Option<LogInstrumentationToggle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogInstrumentationToggle {
    pub enabled: bool,
}

/// Extra metric categories the native metrics collector can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtendedMetricType {
    /// Garbage collection.
    Gc,
    Heap,
    /// Event loop.
    Loop,
}

impl ExtendedMetricType {
    pub const ALL: [Self; 3] = [Self::Gc, Self::Heap, Self::Loop];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gc => "gc",
            Self::Heap => "heap",
            Self::Loop => "loop",
        }
    }
}

impl fmt::Display for ExtendedMetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtendedMetricType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownExtendedMetric(s.to_string()))
    }
}
