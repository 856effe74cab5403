//! Platform identifiers echoed in every result and error payload.

pub const UNKNOWN: &str = "unknown";
pub const LOCAL: &str = "local";
pub const AWS_LAMBDA: &str = "aws-lambda";
pub const GCP_CLOUD_FUNCTIONS: &str = "gcp-cloud-functions";
pub const AZURE_FUNCTIONS: &str = "azure-functions";
pub const CLOUDFLARE_WORKER: &str = "cloudflare-worker";
pub const VERCEL: &str = "vercel";

/// Environment variable each host sets in its function runtime, first match wins.
const HOST_MARKERS: &[(&str, &str)] = &[
    ("AWS_LAMBDA_FUNCTION_NAME", AWS_LAMBDA),
    ("FUNCTION_TARGET", GCP_CLOUD_FUNCTIONS),
    ("K_SERVICE", GCP_CLOUD_FUNCTIONS),
    ("FUNCTIONS_WORKER_RUNTIME", AZURE_FUNCTIONS),
    ("VERCEL", VERCEL),
];

/// Recognise the hosting platform from its runtime environment variables.
pub fn from_env() -> Option<&'static str> {
    from_vars(|key| std::env::var_os(key).is_some_and(|value| !value.is_empty()))
}

fn from_vars(is_set: impl Fn(&str) -> bool) -> Option<&'static str> {
    HOST_MARKERS
        .iter()
        .find(|(key, _)| is_set(key))
        .map(|(_, platform)| *platform)
}
