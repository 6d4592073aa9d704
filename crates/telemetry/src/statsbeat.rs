use azmon_config::ResolvedOptions;
use azmon_errors::GeneralError;
use azmon_options::{
    StatsbeatFeatures, StatsbeatInstrumentations, consts::env_vars, set_process_env,
};
use serde::{Deserialize, Serialize};
use std::env::VarError;
use tracing::{debug, info};

/// The feature and instrumentation masks reported to statsbeat.
///
/// Published as `{"instrumentation":N,"feature":M}` under
/// `AZURE_MONITOR_STATSBEAT_FEATURES`, where the exporter's statsbeat
/// collector picks it up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsbeatSnapshot {
    pub instrumentation: StatsbeatInstrumentations,
    pub feature: StatsbeatFeatures,
}

impl StatsbeatSnapshot {
    pub fn for_options(options: &ResolvedOptions) -> Self {
        Self {
            instrumentation: instrumentations_for(options),
            feature: features_for(options),
        }
    }

    pub fn to_env_value(&self) -> Result<String, GeneralError> {
        serde_json::to_string(self).map_err(|e| GeneralError::EncodingError(e.to_string()))
    }

    pub fn from_env_value(value: &str) -> Result<Self, GeneralError> {
        serde_json::from_str(value).map_err(|e| GeneralError::DecodingError(e.to_string()))
    }
}

/// Distro features in use for the given options.
pub fn features_for(options: &ResolvedOptions) -> StatsbeatFeatures {
    let mut features = StatsbeatFeatures::DISTRO;
    features.set(StatsbeatFeatures::DISK_RETRY, options.offline_storage_enabled());
    features.set(
        StatsbeatFeatures::AAD_HANDLING,
        options.azure_monitor_exporter_config.aad_audience.is_some(),
    );
    features
}

/// Enabled integrations that statsbeat tracks. `http` has no bit.
pub fn instrumentations_for(options: &ResolvedOptions) -> StatsbeatInstrumentations {
    let enabled = &options.instrumentations;
    let mut instrumentations = StatsbeatInstrumentations::empty();
    instrumentations.set(StatsbeatInstrumentations::AZURE_CORE_TRACING, enabled.azure_sdk);
    instrumentations.set(StatsbeatInstrumentations::MONGODB, enabled.mongo_db);
    instrumentations.set(StatsbeatInstrumentations::MYSQL, enabled.my_sql);
    instrumentations.set(StatsbeatInstrumentations::REDIS, enabled.redis || enabled.redis4);
    instrumentations.set(StatsbeatInstrumentations::POSTGRES, enabled.postgre_sql);
    instrumentations
}

/// Writes `snapshot` to the process environment, replacing any earlier value.
pub fn publish_statsbeat(snapshot: &StatsbeatSnapshot) -> Result<(), GeneralError> {
    let value = snapshot.to_env_value()?;
    set_process_env(env_vars::STATSBEAT_FEATURES, &value);
    info!(
        "Statsbeat features: {}, instrumentations: {}",
        snapshot.feature, snapshot.instrumentation
    );
    Ok(())
}

/// Reads the snapshot published by this or a parent process.
///
/// Returns `Ok(None)` when nothing has been published and an error when the
/// published value cannot be decoded.
pub fn read_statsbeat() -> Result<Option<StatsbeatSnapshot>, GeneralError> {
    match std::env::var(env_vars::STATSBEAT_FEATURES) {
        Ok(value) => {
            debug!("Read statsbeat value {}", value);
            StatsbeatSnapshot::from_env_value(&value).map(Some)
        }
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(GeneralError::DecodingError(format!(
            "{} is not valid unicode: {:?}",
            env_vars::STATSBEAT_FEATURES,
            raw
        ))),
    }
}
