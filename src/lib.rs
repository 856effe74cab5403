//! Egress IP detection.
//!
//! Reports the public IPv4 and IPv6 addresses that third-party lookup
//! services observe for outbound requests from this host. The same
//! [`detector::Detector`] backs the serverless-style response wrapper in
//! [`response`] and the local HTTP server in [`daemon`].

pub mod config;
pub mod daemon;
pub mod detector;
pub mod error;
pub mod ip;
pub mod platform;
pub mod response;

pub use detector::{DetectionResult, Detector, DetectorConfig};
pub use error::{Error, Result};
pub use response::{handle_default_request, handle_request, HttpResponse};
