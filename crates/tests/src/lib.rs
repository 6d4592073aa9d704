#![cfg(test)]

#[macro_use]
extern crate log;

use anyhow::Result;
use azmon_config::{ConfigSources, load_options, resolve};
use azmon_options::{
    ApplicationInsightsOptions, AzureMonitorOpenTelemetryOptions, ExtendedMetricType,
    InstrumentationConfig, InstrumentationOptions, StatsbeatFeatures, StatsbeatInstrumentations,
    distro_version_from_env,
};
use azmon_telemetry::{create_telemetry, read_statsbeat};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn init_test_logging() {
    let _ = pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

#[test]
fn test_config_file_to_published_statsbeat() -> Result<()> {
    init_test_logging();

    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("applicationinsights.json");
    fs::write(
        &config_path,
        serde_json::to_string(&json!({
            "azureMonitorExporterConfig": {
                "connectionString": "InstrumentationKey=11111111-1111-1111-1111-111111111111",
                "aadAudience": "https://monitor.azure.com//.default"
            },
            "samplingRatio": 0.1,
            "instrumentationOptions": {
                "mongoDb": { "enabled": true },
                "redis4": { "enabled": true }
            },
            "extendedMetrics": { "heap": true },
            "otlpTraceExporterConfig": { "url": "http://localhost:4318/v1/traces" }
        }))?,
    )?;

    let sources = ConfigSources {
        file: Some(config_path),
        content: Some(r#"{ "samplingRatio": 0.5 }"#.to_string()),
        connection_string: None,
    };
    let programmatic = ApplicationInsightsOptions {
        base: AzureMonitorOpenTelemetryOptions {
            instrumentation_options: Some(InstrumentationOptions {
                postgre_sql: Some(InstrumentationConfig::enabled(true)),
                ..Default::default()
            }),
            ..Default::default()
        },
        otlp_trace_exporter_config: Some(azmon_options::OtlpExporterConfig {
            enabled: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    };

    let options = resolve(load_options(&sources, Some(&programmatic))?)?;
    info!("Resolved options: {:?}", options);

    assert_eq!(options.sampling_ratio, 0.5);
    assert!(options.extended_metric(ExtendedMetricType::Heap));
    assert!(!options.extended_metric(ExtendedMetricType::Gc));
    assert!(options.otlp_trace_exporter.enabled);
    assert_eq!(
        options.otlp_trace_exporter.config.url.as_deref(),
        Some("http://localhost:4318/v1/traces")
    );
    assert_eq!(options.resource.service_name(), Some("Web"));

    let telemetry = create_telemetry(&options)?;

    assert_eq!(distro_version_from_env().as_deref(), Some("1.0.0-beta.3"));

    let published = read_statsbeat()?.expect("statsbeat should be published");
    assert_eq!(published, telemetry.statsbeat());
    assert_eq!(
        published.feature,
        StatsbeatFeatures::DISTRO | StatsbeatFeatures::DISK_RETRY | StatsbeatFeatures::AAD_HANDLING
    );
    assert_eq!(
        published.instrumentation,
        StatsbeatInstrumentations::MONGODB
            | StatsbeatInstrumentations::REDIS
            | StatsbeatInstrumentations::POSTGRES
    );

    telemetry.shutdown()?;
    Ok(())
}

#[test]
fn test_base_only_consumer_reads_extended_config() -> Result<()> {
    init_test_logging();

    let extended = ApplicationInsightsOptions {
        enable_auto_collect_exceptions: Some(false),
        extended_metrics: Some([("gc".to_string(), true)].into_iter().collect()),
        base: AzureMonitorOpenTelemetryOptions {
            sampling_ratio: Some(0.75),
            ..Default::default()
        },
        ..Default::default()
    };

    let value = serde_json::to_value(&extended)?;
    let base: AzureMonitorOpenTelemetryOptions = serde_json::from_value(value)?;
    assert_eq!(&base, extended.base());

    // Resolving the base alone only loses the extension settings
    let resolved = resolve(ApplicationInsightsOptions::from(base))?;
    assert_eq!(resolved.sampling_ratio, 0.75);
    assert!(resolved.enable_auto_collect_exceptions);
    assert!(!resolved.extended_metric(ExtendedMetricType::Gc));

    Ok(())
}
