use std::time::Duration;

use super::endpoint::{AddressFamily, Endpoint};
use super::external::IpLookup;

/// Try `endpoints` in order and return the first non-empty candidate.
///
/// Later endpoints are never contacted once one answers. `None` means every
/// endpoint came back empty, which is an ordinary outcome on single-stack
/// networks.
pub async fn resolve_first(
    lookup: &dyn IpLookup,
    family: AddressFamily,
    endpoints: &[Endpoint],
    timeout: Duration,
) -> Option<String> {
    for endpoint in endpoints {
        match lookup.fetch(endpoint, timeout).await {
            Some(candidate) if !candidate.is_empty() => {
                tracing::debug!("{} candidate {} from {}", family, candidate, endpoint.url);
                return Some(candidate);
            }
            _ => {
                tracing::debug!("{} lookup via {} gave no result", family, endpoint.url);
            }
        }
    }

    tracing::debug!("All {} endpoints failed", family);
    None
}
