//! Egress IP detection.
//!
//! A [`Detector`] looks up both address families concurrently, each through
//! its own ordered fallback list, and assembles a [`DetectionResult`]. The
//! detection itself cannot fail; unreachable families come back as `None`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ip::{self, AddressFamily, Endpoint, HttpLookup, IpLookup};
use crate::platform;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectorConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "ip::default_ipv4_endpoints")]
    pub ipv4: Vec<Endpoint>,
    #[serde(default = "ip::default_ipv6_endpoints")]
    pub ipv6: Vec<Endpoint>,
}

fn default_timeout_ms() -> u64 {
    ip::DEFAULT_TIMEOUT.as_millis() as u64
}

fn default_user_agent() -> String {
    ip::USER_AGENT.to_string()
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            ipv4: ip::default_ipv4_endpoints(),
            ipv6: ip::default_ipv6_endpoints(),
        }
    }
}

impl DetectorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn endpoints(&self, family: AddressFamily) -> &[Endpoint] {
        match family {
            AddressFamily::V4 => &self.ipv4,
            AddressFamily::V6 => &self.ipv6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub ipv4: Option<String>,
    pub ipv6: Option<String>,
    pub timestamp: String,
    pub platform: String,
    pub detection_time_ms: u64,
}

#[derive(Clone)]
pub struct Detector {
    config: Arc<DetectorConfig>,
    lookup: Arc<dyn IpLookup>,
}

impl Detector {
    /// Build a detector that queries the configured endpoints over HTTP.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        let lookup = HttpLookup::new(&config.user_agent)?;
        Ok(Self::with_lookup(config, Arc::new(lookup)))
    }

    pub fn with_lookup(config: DetectorConfig, lookup: Arc<dyn IpLookup>) -> Self {
        Self {
            config: Arc::new(config),
            lookup,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detect the egress addresses for both families.
    ///
    /// `platform` is echoed into the result, `"unknown"` when not given.
    pub async fn detect(&self, platform: Option<&str>) -> DetectionResult {
        let platform = platform.unwrap_or(platform::UNKNOWN);
        let started = Instant::now();

        let (ipv4, ipv6) = tokio::join!(
            self.resolve(AddressFamily::V4),
            self.resolve(AddressFamily::V6)
        );

        // Services occasionally answer with the other family
        let ipv4 = ipv4.filter(|candidate| ip::is_ipv4(candidate));
        let ipv6 = ipv6.filter(|candidate| ip::is_ipv6(candidate));

        let detection_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        tracing::debug!(
            "Detected ipv4={:?} ipv6={:?} in {}ms for {}",
            ipv4,
            ipv6,
            detection_time_ms,
            platform
        );

        DetectionResult {
            ipv4,
            ipv6,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            platform: platform.to_string(),
            detection_time_ms,
        }
    }

    async fn resolve(&self, family: AddressFamily) -> Option<String> {
        ip::resolve_first(
            self.lookup.as_ref(),
            family,
            self.config.endpoints(family),
            self.config.timeout(),
        )
        .await
    }
}
