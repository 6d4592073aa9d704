use thiserror::Error;

// general reusable errors
#[derive(Error, Debug)]
pub enum GeneralError {
    #[error("encoding: {0}")]
    EncodingError(String),
    #[error("decoding: {0}")]
    DecodingError(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("sampling ratio must be a finite number between 0.0 and 1.0, got {0}")]
    InvalidSamplingRatio(f64),
    #[error("invalid connection string: {0}")]
    InvalidConnectionString(String),
    #[error("unknown extended metric type: {0}")]
    UnknownExtendedMetric(String),
    #[error("configuration file not found: {0}")]
    FileNotFound(String),
    #[error("parsing {source_name}: {message}")]
    ParsingError { source_name: String, message: String },
}
