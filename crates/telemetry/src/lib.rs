//! # Azure Monitor telemetry pipeline
//!
//! Turns resolved distro options into a running OpenTelemetry setup: the
//! resource and sampler, the global tracer and meter providers, and the
//! statsbeat masks published for the exporter.
//!
//! Exporters are not attached here; the providers carry the configuration
//! the exporters need.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use azmon_config::{ConfigSources, load_options, resolve};
//! use azmon_telemetry::create_telemetry;
//!
//! fn main() -> anyhow::Result<()> {
//!     let options = load_options(&ConfigSources::from_env(), None)?;
//!     let telemetry = create_telemetry(&resolve(options)?)?;
//!
//!     tracing::info!("Service started");
//!
//!     telemetry.shutdown()?;
//!     Ok(())
//! }
//! ```

mod error;
mod factory;

pub mod resource;
pub mod statsbeat;

#[cfg(test)]
mod tests;

pub use error::TelemetryError;
pub use factory::{TelemetryInstance, create_telemetry};
pub use resource::{build_resource, build_sampler};
pub use statsbeat::{
    StatsbeatSnapshot, features_for, instrumentations_for, publish_statsbeat, read_statsbeat,
};
