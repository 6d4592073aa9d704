use crate::{
    error::TelemetryError,
    resource::{build_resource, build_sampler},
    statsbeat::{StatsbeatSnapshot, publish_statsbeat},
};

use azmon_config::{ResolvedOptions, ResolvedOtlpExporter, validate_sampling_ratio};
use azmon_options::publish_distro_version;
use opentelemetry::global;
use opentelemetry_sdk::{metrics::SdkMeterProvider, trace::SdkTracerProvider};
use tracing::{error, info};

/// An initialized distro pipeline.
///
/// Holds the tracer and meter providers installed as the global
/// OpenTelemetry providers. Call [`TelemetryInstance::shutdown`] before the
/// process exits.
pub struct TelemetryInstance {
    options: ResolvedOptions,
    tracer_provider: SdkTracerProvider,
    meter_provider: SdkMeterProvider,
    statsbeat: StatsbeatSnapshot,
}

impl TelemetryInstance {
    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    pub fn tracer_provider(&self) -> &SdkTracerProvider {
        &self.tracer_provider
    }

    pub fn meter_provider(&self) -> &SdkMeterProvider {
        &self.meter_provider
    }

    /// The statsbeat masks published when this instance was created.
    pub fn statsbeat(&self) -> StatsbeatSnapshot {
        self.statsbeat
    }

    /// Shuts down both providers. Both are always attempted; the errors
    /// are reported together.
    pub fn shutdown(self) -> Result<(), TelemetryError> {
        info!("Shutting down telemetry");

        let errors: Vec<String> = [
            self.tracer_provider
                .shutdown()
                .map_err(|e| format!("tracer provider: {}", e))
                .err(),
            self.meter_provider
                .shutdown()
                .map_err(|e| format!("meter provider: {}", e))
                .err(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            error!("Failed to shut down telemetry: {}", errors.join("; "));
            Err(TelemetryError::ShutdownError(errors.join("; ")))
        }
    }
}

fn log_otlp_exporter(signal: &str, exporter: &ResolvedOtlpExporter) {
    if exporter.enabled {
        info!(
            "OTLP {} exporter enabled, endpoint: {}",
            signal,
            exporter.config.url.as_deref().unwrap_or("default")
        );
    }
}

/// Sets up the distro pipeline for already resolved options.
///
/// Publishes the distro version, installs tracer and meter providers
/// carrying the configured resource and sampler as the global providers,
/// then publishes the statsbeat masks.
pub fn create_telemetry(options: &ResolvedOptions) -> Result<TelemetryInstance, TelemetryError> {
    let version = publish_distro_version();
    info!("Initializing Azure Monitor OpenTelemetry distro {}", version);

    validate_sampling_ratio(options.sampling_ratio)?;

    let resource = build_resource(&options.resource);

    let tracer_provider = SdkTracerProvider::builder()
        .with_sampler(build_sampler(options.sampling_ratio))
        .with_resource(resource.clone())
        .build();
    let meter_provider = SdkMeterProvider::builder().with_resource(resource).build();

    global::set_tracer_provider(tracer_provider.clone());
    global::set_meter_provider(meter_provider.clone());

    log_otlp_exporter("trace", &options.otlp_trace_exporter);
    log_otlp_exporter("metric", &options.otlp_metric_exporter);
    log_otlp_exporter("log", &options.otlp_log_exporter);

    let statsbeat = StatsbeatSnapshot::for_options(options);
    publish_statsbeat(&statsbeat)?;

    Ok(TelemetryInstance {
        options: options.clone(),
        tracer_provider,
        meter_provider,
        statsbeat,
    })
}
