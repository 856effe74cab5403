use std::fmt;

use serde::{Deserialize, Serialize};

/// JSON field holding the address in `json` responses (ipify format).
pub const IP_FIELD: &str = "ip";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// `{"ip": "x.x.x.x"}`
    Json,
    /// The bare address, possibly surrounded by whitespace.
    Text,
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseFormat::Json => write!(f, "json"),
            ResponseFormat::Text => write!(f, "text"),
        }
    }
}

impl ResponseFormat {
    /// Pull a candidate address out of a response body.
    ///
    /// Returns `None` for anything that is not a non-empty trimmed string,
    /// including bodies that fail to parse as JSON.
    pub fn extract(self, body: &str) -> Option<String> {
        let candidate = match self {
            ResponseFormat::Json => {
                let json: serde_json::Value = serde_json::from_str(body).ok()?;
                json.get(IP_FIELD)?.as_str()?.trim().to_string()
            }
            ResponseFormat::Text => body.trim().to_string(),
        };

        if candidate.is_empty() {
            None
        } else {
            Some(candidate)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub format: ResponseFormat,
}

impl Endpoint {
    pub fn json(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format: ResponseFormat::Json,
        }
    }

    pub fn text(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            format: ResponseFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => write!(f, "IPv4"),
            AddressFamily::V6 => write!(f, "IPv6"),
        }
    }
}

pub fn default_ipv4_endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::json("https://api.ipify.org?format=json"),
        Endpoint::text("https://ipv4.icanhazip.com"),
    ]
}

pub fn default_ipv6_endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::json("https://api6.ipify.org?format=json"),
        Endpoint::text("https://ipv6.icanhazip.com"),
    ]
}
