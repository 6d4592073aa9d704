//! Layered loading, default resolution and validation of the distro options.
//!
//! # Precedence Order
//! 1. Options passed programmatically override all other sources
//! 2. `APPLICATIONINSIGHTS_CONNECTION_STRING` overrides the connection string
//! 3. `APPLICATIONINSIGHTS_CONFIGURATION_CONTENT` overrides the config file
//! 4. The config file (`APPLICATIONINSIGHTS_CONFIGURATION_FILE`, or
//!    `applicationinsights.json` in the working directory) provides base values

pub mod builder;
pub mod resolve;
pub mod sources;
pub mod validation;


pub use builder::OptionsBuilder;
pub use resolve::{
    ResolvedInstrumentations, ResolvedLogInstrumentations, ResolvedOptions, ResolvedOtlpExporter,
    resolve,
};
pub use sources::{ConfigSources, load_options};
pub use validation::{validate_connection_string, validate_options, validate_sampling_ratio};
