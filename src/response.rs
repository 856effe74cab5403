//! Ready-to-send HTTP responses around a detection.
//!
//! This is the boundary where internal faults become the 500 error payload.
//! Platform adapters only have to copy status, headers and body into their
//! own response type.

use reqwest::StatusCode;
use tokio::task::JoinError;

use crate::detector::{DetectionResult, Detector, DetectorConfig};
use crate::error::{Error, Result};

/// Headers sent on success and error alike.
pub const RESPONSE_HEADERS: [(&str, &str); 3] = [
    ("Content-Type", "application/json"),
    ("Cache-Control", "no-cache, no-store, must-revalidate"),
    ("Access-Control-Allow-Origin", "*"),
];

pub const ERROR_SUMMARY: &str = "Failed to detect egress IP";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: [(&'static str, &'static str); 3],
    pub body: String,
}

impl HttpResponse {
    pub fn ok(result: &DetectionResult) -> Result<Self> {
        Ok(Self {
            status: StatusCode::OK,
            headers: RESPONSE_HEADERS,
            body: serde_json::to_string_pretty(result)?,
        })
    }

    pub fn fault(platform: &str, message: &str) -> Self {
        let payload = serde_json::json!({
            "error": ERROR_SUMMARY,
            "message": message,
            "platform": platform,
        });

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            headers: RESPONSE_HEADERS,
            body: format!("{:#}", payload),
        }
    }

    pub fn header(&self, name: &str) -> Option<&'static str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }
}

/// Run a detection and wrap it into a response.
///
/// The detection runs on its own task so a panic below this point turns into
/// a 500 instead of taking the caller down.
pub async fn handle_request(detector: &Detector, platform: &str) -> HttpResponse {
    match detect_and_encode(detector, platform).await {
        Ok(response) => response,
        Err(e) => fault_response(platform, &e),
    }
}

/// [`handle_request`] with the built-in endpoint configuration.
pub async fn handle_default_request(platform: &str) -> HttpResponse {
    match Detector::new(DetectorConfig::default()) {
        Ok(detector) => handle_request(&detector, platform).await,
        Err(e) => fault_response(platform, &e),
    }
}

async fn detect_and_encode(detector: &Detector, platform: &str) -> Result<HttpResponse> {
    let detector = detector.clone();
    let platform = platform.to_string();

    let result = tokio::spawn(async move { detector.detect(Some(platform.as_str())).await })
        .await
        .map_err(|e| Error::Task(join_error_message(e)))?;

    HttpResponse::ok(&result)
}

fn fault_response(platform: &str, error: &Error) -> HttpResponse {
    tracing::error!("Egress IP detection failed on {}: {}", platform, error);
    HttpResponse::fault(platform, &error.to_string())
}

fn join_error_message(error: JoinError) -> String {
    if !error.is_panic() {
        return error.to_string();
    }

    let panic = error.into_panic();
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panicked".to_string()
    }
}
