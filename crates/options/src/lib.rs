//! # Azure Monitor OpenTelemetry options
//!
//! The configuration surface of the distro: the option types accepted by the
//! initializer, the statsbeat bitmasks used to report which features and
//! instrumentations are active, and the handful of well-known constants and
//! environment variables shared with other processes.
//!
//! Nothing in this crate validates or defaults option values; that is the job
//! of the initializer consuming them (see `azmon-config`).
//!
//! ## Quick Start
//!
//! ```rust
//! use azmon_options::{
//!     ApplicationInsightsOptions, OtlpExporterConfig, StatsbeatFeatures, publish_distro_version,
//! };
//!
//! // Make the running distro version discoverable by child processes.
//! publish_distro_version();
//!
//! let options = ApplicationInsightsOptions {
//!     enable_auto_collect_exceptions: Some(false),
//!     otlp_trace_exporter_config: Some(OtlpExporterConfig {
//!         enabled: Some(true),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//! assert!(options.sampling_ratio.is_none());
//!
//! let features = StatsbeatFeatures::DISTRO | StatsbeatFeatures::DISK_RETRY;
//! assert!(features.contains(StatsbeatFeatures::DISTRO));
//! ```

pub mod consts;
pub mod env;
pub mod extended;
pub mod options;
pub mod statsbeat;


pub use consts::{AZURE_MONITOR_OPENTELEMETRY_VERSION, DEFAULT_ROLE_NAME};
pub use env::{distro_version_from_env, publish_distro_version, set_process_env};
pub use extended::{
    ApplicationInsightsOptions, ExtendedMetricType, LogInstrumentationOptions,
    LogInstrumentationToggle, OtlpCompression, OtlpExporterConfig, OtlpExporterNodeConfigBase,
};
pub use options::{
    AzureMonitorExporterOptions, AzureMonitorOpenTelemetryOptions, InstrumentationConfig,
    InstrumentationOptions, ResourceOptions,
};
pub use statsbeat::{StatsbeatFeatures, StatsbeatInstrumentations};
