use lazy_static::lazy_static;
use parking_lot::Mutex;
use tracing::debug;

use crate::consts::{AZURE_MONITOR_OPENTELEMETRY_VERSION, env_vars};

lazy_static! {
    // Serializes every process environment write made by the distro.
    static ref ENV_LOCK: Mutex<()> = Mutex::new(());
}

/// Writes `value` under `key` in the process environment.
///
/// All environment writes done by the distro go through here so they never
/// race with each other.
pub fn set_process_env(key: &str, value: &str) {
    let _guard = ENV_LOCK.lock();
    // SAFETY: writes from this workspace are serialized by ENV_LOCK and only
    // happen during startup.
    unsafe { std::env::set_var(key, value) };
    debug!("Published {}={}", key, value);
}

/// Publishes the distro version under `AZURE_MONITOR_DISTRO_VERSION`.
///
/// Call once during process startup, before any instrumentation is set up.
/// The value is overwritten unconditionally, so calling this again (or after
/// another distro version wrote the variable) leaves exactly this crate's
/// version in place.
pub fn publish_distro_version() -> &'static str {
    set_process_env(env_vars::DISTRO_VERSION, AZURE_MONITOR_OPENTELEMETRY_VERSION);
    AZURE_MONITOR_OPENTELEMETRY_VERSION
}

/// Reads back the distro version published by this or a parent process.
pub fn distro_version_from_env() -> Option<String> {
    std::env::var(env_vars::DISTRO_VERSION).ok()
}
