use azmon_config::{ResolvedOptions, resolve};
use azmon_errors::{ConfigError, GeneralError};
use azmon_options::{
    ApplicationInsightsOptions, AzureMonitorExporterOptions, AzureMonitorOpenTelemetryOptions,
    InstrumentationConfig, InstrumentationOptions, StatsbeatFeatures, StatsbeatInstrumentations,
    consts::env_vars, distro_version_from_env, set_process_env,
};
use lazy_static::lazy_static;
use parking_lot::Mutex;
use serde_json::json;

use crate::{
    StatsbeatSnapshot, TelemetryError, create_telemetry, features_for, instrumentations_for,
    publish_statsbeat, read_statsbeat,
};

lazy_static! {
    // Tests that read back AZURE_MONITOR_STATSBEAT_FEATURES hold this.
    static ref STATSBEAT_ENV: Mutex<()> = Mutex::new(());
}

fn resolved(base: AzureMonitorOpenTelemetryOptions) -> ResolvedOptions {
    resolve(ApplicationInsightsOptions::from(base)).unwrap()
}

// ===== STATSBEAT MASKS =====

#[test]
fn test_default_features() {
    let options = resolved(AzureMonitorOpenTelemetryOptions::default());
    assert_eq!(
        features_for(&options),
        StatsbeatFeatures::DISTRO | StatsbeatFeatures::DISK_RETRY
    );
    assert!(instrumentations_for(&options).is_empty());
}

#[test]
fn test_features_follow_exporter_config() {
    let options = resolved(AzureMonitorOpenTelemetryOptions {
        azure_monitor_exporter_config: Some(AzureMonitorExporterOptions {
            disable_offline_storage: Some(true),
            aad_audience: Some("https://monitor.azure.com//.default".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    });

    let features = features_for(&options);
    assert!(features.contains(StatsbeatFeatures::DISTRO));
    assert!(features.contains(StatsbeatFeatures::AAD_HANDLING));
    assert!(!features.contains(StatsbeatFeatures::DISK_RETRY));
    assert!(!features.contains(StatsbeatFeatures::WEB_SNIPPET));
}

#[test]
fn test_instrumentations_follow_enabled_integrations() {
    let options = resolved(AzureMonitorOpenTelemetryOptions {
        instrumentation_options: Some(InstrumentationOptions {
            mongo_db: Some(InstrumentationConfig::enabled(true)),
            redis4: Some(InstrumentationConfig::enabled(true)),
            my_sql: Some(InstrumentationConfig::enabled(false)),
            http: Some(InstrumentationConfig::enabled(true)),
            ..Default::default()
        }),
        ..Default::default()
    });

    assert_eq!(
        instrumentations_for(&options),
        StatsbeatInstrumentations::MONGODB | StatsbeatInstrumentations::REDIS
    );
}

#[test]
fn test_snapshot_env_value_format() {
    let snapshot = StatsbeatSnapshot {
        instrumentation: StatsbeatInstrumentations::MONGODB | StatsbeatInstrumentations::POSTGRES,
        feature: StatsbeatFeatures::DISTRO | StatsbeatFeatures::DISK_RETRY,
    };

    let value = snapshot.to_env_value().unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(&value).unwrap(),
        json!({ "instrumentation": 18, "feature": 9 })
    );
    assert_eq!(StatsbeatSnapshot::from_env_value(&value).unwrap(), snapshot);
}

#[test]
fn test_snapshot_rejects_unknown_bits() {
    assert!(StatsbeatSnapshot::from_env_value(r#"{"instrumentation":64,"feature":1}"#).is_err());
    assert!(StatsbeatSnapshot::from_env_value("not json").is_err());
}

#[test]
fn test_publish_and_read_statsbeat() {
    let _guard = STATSBEAT_ENV.lock();
    let snapshot = StatsbeatSnapshot {
        instrumentation: StatsbeatInstrumentations::AZURE_CORE_TRACING,
        feature: StatsbeatFeatures::DISTRO | StatsbeatFeatures::AAD_HANDLING,
    };

    publish_statsbeat(&snapshot).unwrap();
    assert_eq!(read_statsbeat().unwrap(), Some(snapshot));

    // A later publication replaces the earlier one
    publish_statsbeat(&StatsbeatSnapshot::default()).unwrap();
    assert_eq!(read_statsbeat().unwrap(), Some(StatsbeatSnapshot::default()));
}

#[test]
fn test_read_statsbeat_reports_garbage() {
    let _guard = STATSBEAT_ENV.lock();
    set_process_env(env_vars::STATSBEAT_FEATURES, "{");
    assert!(read_statsbeat().is_err());
}

#[cfg(unix)]
#[test]
fn test_read_statsbeat_reports_non_unicode_value() {
    use std::{ffi::OsString, os::unix::ffi::OsStringExt};

    let _guard = STATSBEAT_ENV.lock();
    // SAFETY: the only writers of this variable in this binary hold STATSBEAT_ENV.
    unsafe {
        std::env::set_var(env_vars::STATSBEAT_FEATURES, OsString::from_vec(vec![0x7b, 0xff]));
    }

    assert!(matches!(read_statsbeat(), Err(GeneralError::DecodingError(_))));
}

// ===== PIPELINE =====

#[test]
fn test_create_telemetry_publishes_version_and_statsbeat() {
    let _guard = STATSBEAT_ENV.lock();
    let options = resolved(AzureMonitorOpenTelemetryOptions {
        sampling_ratio: Some(0.5),
        instrumentation_options: Some(InstrumentationOptions {
            postgre_sql: Some(InstrumentationConfig::enabled(true)),
            ..Default::default()
        }),
        ..Default::default()
    });

    let telemetry = create_telemetry(&options).unwrap();

    assert_eq!(distro_version_from_env().as_deref(), Some("1.0.0-beta.3"));
    assert_eq!(
        telemetry.statsbeat().instrumentation,
        StatsbeatInstrumentations::POSTGRES
    );
    assert_eq!(read_statsbeat().unwrap(), Some(telemetry.statsbeat()));
    assert_eq!(telemetry.options(), &options);

    telemetry.shutdown().unwrap();
}

#[test]
fn test_create_telemetry_rejects_invalid_ratio() {
    let mut options = resolved(AzureMonitorOpenTelemetryOptions::default());
    options.sampling_ratio = 1.5;

    match create_telemetry(&options) {
        Err(TelemetryError::Config(e)) => {
            assert_eq!(e, ConfigError::InvalidSamplingRatio(1.5))
        }
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("expected an invalid sampling ratio error"),
    }
}

#[test]
fn test_shutdown_twice_is_reported() {
    let _guard = STATSBEAT_ENV.lock();
    let telemetry = create_telemetry(&resolved(Default::default())).unwrap();
    let tracer_provider = telemetry.tracer_provider().clone();

    telemetry.shutdown().unwrap();
    assert!(tracer_provider.shutdown().is_err());
}
