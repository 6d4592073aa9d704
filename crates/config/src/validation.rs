use azmon_errors::ConfigError;
use azmon_options::{ApplicationInsightsOptions, ExtendedMetricType, OtlpExporterConfig};
use std::str::FromStr;
use tracing::warn;

/// Validate the option values that the distro itself interprets.
///
/// Pass-through configuration (instrumentation and exporter extras) is left
/// to the libraries that own it.
pub fn validate_options(options: &ApplicationInsightsOptions) -> Result<(), ConfigError> {
    if let Some(ratio) = options.sampling_ratio {
        validate_sampling_ratio(ratio)?;
    }

    match options
        .azure_monitor_exporter_config
        .as_ref()
        .and_then(|exporter| exporter.connection_string.as_deref())
    {
        Some(connection_string) => validate_connection_string(connection_string)?,
        None => warn!("No connection string configured, the Azure Monitor exporter will not send telemetry"),
    }

    if let Some(extended_metrics) = &options.extended_metrics {
        for name in extended_metrics.keys() {
            if ExtendedMetricType::from_str(name).is_err() {
                warn!("Ignoring unknown extended metric type '{}'", name);
            }
        }
    }

    for (signal, config) in [
        ("trace", &options.otlp_trace_exporter_config),
        ("metric", &options.otlp_metric_exporter_config),
        ("log", &options.otlp_log_exporter_config),
    ] {
        if let Some(OtlpExporterConfig { base, enabled: Some(true) }) = config {
            if base.url.is_none() {
                warn!("OTLP {} exporter enabled without a url, the exporter default endpoint will be used", signal);
            }
        }
    }

    Ok(())
}

pub fn validate_sampling_ratio(ratio: f64) -> Result<(), ConfigError> {
    if ratio.is_finite() && (0.0..=1.0).contains(&ratio) {
        Ok(())
    } else {
        Err(ConfigError::InvalidSamplingRatio(ratio))
    }
}

/// Check that a connection string is a `;`-separated list of `key=value`
/// pairs with a non-empty `InstrumentationKey`.
pub fn validate_connection_string(connection_string: &str) -> Result<(), ConfigError> {
    let mut instrumentation_key = None;

    for segment in connection_string.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let (key, value) = segment.split_once('=').ok_or_else(|| {
            ConfigError::InvalidConnectionString(format!("segment '{}' is not a key=value pair", segment))
        })?;
        if key.trim().eq_ignore_ascii_case("InstrumentationKey") {
            instrumentation_key = Some(value.trim());
        }
    }

    match instrumentation_key {
        Some(key) if !key.is_empty() => Ok(()),
        _ => Err(ConfigError::InvalidConnectionString(
            "missing InstrumentationKey".to_string(),
        )),
    }
}
