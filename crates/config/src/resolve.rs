use azmon_errors::ConfigError;
use azmon_options::{
    ApplicationInsightsOptions, AzureMonitorExporterOptions, DEFAULT_ROLE_NAME, ExtendedMetricType,
    InstrumentationConfig, InstrumentationOptions, LogInstrumentationToggle,
    OtlpExporterConfig, OtlpExporterNodeConfigBase, ResourceOptions, consts::SERVICE_NAME_ATTRIBUTE,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::validation::validate_options;

// Defaults applied to options the caller left out
mod defaults {
    pub const SAMPLING_RATIO: f64 = 1.0;
    pub const AUTO_COLLECT_EXCEPTIONS: bool = true;
    pub const AUTO_COLLECT_PERFORMANCE: bool = true;
    pub const HTTP_INSTRUMENTATION: bool = true;
    pub const OTHER_INSTRUMENTATION: bool = false;
    pub const LOG_INSTRUMENTATION: bool = false;
    pub const OTLP_EXPORTER: bool = false;
    pub const EXTENDED_METRIC: bool = false;
}

/// Options with every default applied, ready for the pipeline to consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOptions {
    pub sampling_ratio: f64,
    pub enable_auto_collect_exceptions: bool,
    pub enable_auto_collect_performance: bool,
    pub azure_monitor_exporter_config: AzureMonitorExporterOptions,
    /// Always carries `service.name`.
    pub resource: ResourceOptions,
    pub instrumentations: ResolvedInstrumentations,
    /// Per-instrumentation configuration, passed through as given.
    pub instrumentation_options: InstrumentationOptions,
    pub log_instrumentations: ResolvedLogInstrumentations,
    pub otlp_trace_exporter: ResolvedOtlpExporter,
    pub otlp_metric_exporter: ResolvedOtlpExporter,
    pub otlp_log_exporter: ResolvedOtlpExporter,
    /// One entry per [`ExtendedMetricType`], keyed by its name.
    pub extended_metrics: BTreeMap<String, bool>,
}

impl ResolvedOptions {
    pub fn extended_metric(&self, kind: ExtendedMetricType) -> bool {
        self.extended_metrics
            .get(kind.as_str())
            .copied()
            .unwrap_or(defaults::EXTENDED_METRIC)
    }

    /// Whether telemetry that fails to export is kept on disk for retry.
    pub fn offline_storage_enabled(&self) -> bool {
        !self
            .azure_monitor_exporter_config
            .disable_offline_storage
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedInstrumentations {
    pub azure_sdk: bool,
    pub http: bool,
    pub mongo_db: bool,
    pub my_sql: bool,
    pub postgre_sql: bool,
    pub redis: bool,
    pub redis4: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedLogInstrumentations {
    pub console: bool,
    pub bunyan: bool,
    pub winston: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedOtlpExporter {
    pub enabled: bool,
    #[serde(flatten)]
    pub config: OtlpExporterNodeConfigBase,
}

fn instrumentation_enabled(config: Option<&InstrumentationConfig>, default: bool) -> bool {
    config.and_then(|c| c.enabled).unwrap_or(default)
}

fn log_instrumentation_enabled(toggle: Option<LogInstrumentationToggle>) -> bool {
    toggle.map_or(defaults::LOG_INSTRUMENTATION, |t| t.enabled)
}

fn resolve_otlp(config: Option<OtlpExporterConfig>) -> ResolvedOtlpExporter {
    let config = config.unwrap_or_default();
    ResolvedOtlpExporter {
        enabled: config.enabled.unwrap_or(defaults::OTLP_EXPORTER),
        config: config.base,
    }
}

/// Validate `options` and fill in every default.
pub fn resolve(options: ApplicationInsightsOptions) -> Result<ResolvedOptions, ConfigError> {
    validate_options(&options)?;

    let ApplicationInsightsOptions {
        base,
        enable_auto_collect_exceptions,
        log_instrumentation_options,
        otlp_trace_exporter_config,
        otlp_metric_exporter_config,
        otlp_log_exporter_config,
        enable_auto_collect_performance,
        extended_metrics,
    } = options;

    let mut resource = base.resource.unwrap_or_default();
    if resource.service_name().is_none() {
        resource
            .attributes
            .insert(SERVICE_NAME_ATTRIBUTE.to_string(), DEFAULT_ROLE_NAME.to_string());
    }

    let instrumentation_options = base.instrumentation_options.unwrap_or_default();
    let instrumentations = ResolvedInstrumentations {
        azure_sdk: instrumentation_enabled(
            instrumentation_options.azure_sdk.as_ref(),
            defaults::OTHER_INSTRUMENTATION,
        ),
        http: instrumentation_enabled(
            instrumentation_options.http.as_ref(),
            defaults::HTTP_INSTRUMENTATION,
        ),
        mongo_db: instrumentation_enabled(
            instrumentation_options.mongo_db.as_ref(),
            defaults::OTHER_INSTRUMENTATION,
        ),
        my_sql: instrumentation_enabled(
            instrumentation_options.my_sql.as_ref(),
            defaults::OTHER_INSTRUMENTATION,
        ),
        postgre_sql: instrumentation_enabled(
            instrumentation_options.postgre_sql.as_ref(),
            defaults::OTHER_INSTRUMENTATION,
        ),
        redis: instrumentation_enabled(
            instrumentation_options.redis.as_ref(),
            defaults::OTHER_INSTRUMENTATION,
        ),
        redis4: instrumentation_enabled(
            instrumentation_options.redis4.as_ref(),
            defaults::OTHER_INSTRUMENTATION,
        ),
    };

    let log_options = log_instrumentation_options.unwrap_or_default();
    let log_instrumentations = ResolvedLogInstrumentations {
        console: log_instrumentation_enabled(log_options.console),
        bunyan: log_instrumentation_enabled(log_options.bunyan),
        winston: log_instrumentation_enabled(log_options.winston),
    };

    let extended_metrics = extended_metrics.unwrap_or_default();
    let extended_metrics = ExtendedMetricType::ALL
        .into_iter()
        .map(|kind| {
            let enabled = extended_metrics
                .get(kind.as_str())
                .copied()
                .unwrap_or(defaults::EXTENDED_METRIC);
            (kind.as_str().to_string(), enabled)
        })
        .collect();

    let resolved = ResolvedOptions {
        sampling_ratio: base.sampling_ratio.unwrap_or(defaults::SAMPLING_RATIO),
        enable_auto_collect_exceptions: enable_auto_collect_exceptions
            .unwrap_or(defaults::AUTO_COLLECT_EXCEPTIONS),
        enable_auto_collect_performance: enable_auto_collect_performance
            .unwrap_or(defaults::AUTO_COLLECT_PERFORMANCE),
        azure_monitor_exporter_config: base.azure_monitor_exporter_config.unwrap_or_default(),
        resource,
        instrumentations,
        instrumentation_options,
        log_instrumentations,
        otlp_trace_exporter: resolve_otlp(otlp_trace_exporter_config),
        otlp_metric_exporter: resolve_otlp(otlp_metric_exporter_config),
        otlp_log_exporter: resolve_otlp(otlp_log_exporter_config),
        extended_metrics,
    };

    info!(
        "Resolved options: sampling_ratio={}, exceptions={}, performance={}",
        resolved.sampling_ratio,
        resolved.enable_auto_collect_exceptions,
        resolved.enable_auto_collect_performance
    );

    Ok(resolved)
}
