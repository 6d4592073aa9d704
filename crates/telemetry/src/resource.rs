use azmon_options::{DEFAULT_ROLE_NAME, ResourceOptions, consts::SERVICE_NAME_ATTRIBUTE};
use opentelemetry::KeyValue;
use opentelemetry_sdk::{Resource, trace::Sampler};

/// Builds the OpenTelemetry resource shared by every provider.
///
/// `service.name` comes from the attributes, falling back to
/// [`DEFAULT_ROLE_NAME`]. Every other attribute is copied as a string.
pub fn build_resource(options: &ResourceOptions) -> Resource {
    let service_name = options.service_name().unwrap_or(DEFAULT_ROLE_NAME).to_string();

    options
        .attributes
        .iter()
        .filter(|(key, _)| key.as_str() != SERVICE_NAME_ATTRIBUTE)
        .fold(
            Resource::builder().with_service_name(service_name),
            |builder, (key, value)| {
                builder.with_attribute(KeyValue::new(key.clone(), value.clone()))
            },
        )
        .build()
}

/// Picks the trace sampler for a sampling ratio.
pub fn build_sampler(ratio: f64) -> Sampler {
    if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}
