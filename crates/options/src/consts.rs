/// Version of the distro, published to [`env_vars::DISTRO_VERSION`].
pub const AZURE_MONITOR_OPENTELEMETRY_VERSION: &str = "1.0.0-beta.3";

/// Role name attached to telemetry when the caller does not provide a
/// `service.name` resource attribute.
pub const DEFAULT_ROLE_NAME: &str = "Web";

/// Resource attribute key holding the role name.
pub const SERVICE_NAME_ATTRIBUTE: &str = "service.name";

/// Environment variable names shared with other processes.
pub mod env_vars {
    /// Receives [`super::AZURE_MONITOR_OPENTELEMETRY_VERSION`] on startup.
    pub const DISTRO_VERSION: &str = "AZURE_MONITOR_DISTRO_VERSION";

    /// Key under which statsbeat reports the enabled feature and
    /// instrumentation bitmasks. Only the name lives here.
    pub const STATSBEAT_FEATURES: &str = "AZURE_MONITOR_STATSBEAT_FEATURES";
}
