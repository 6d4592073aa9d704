use azmon_errors::{ConfigError, GeneralError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Telemetry initialization error: {0}")]
    InitializationError(String),
    #[error("Telemetry shutdown error: {0}")]
    ShutdownError(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    General(#[from] GeneralError),
}
