//! End-to-end detection tests against mock lookup services.

use std::time::Duration;

use egressd::ip::Endpoint;
use egressd::{handle_request, Detector, DetectorConfig};
use reqwest::StatusCode;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn detector_config(ipv4: Vec<Endpoint>, ipv6: Vec<Endpoint>) -> DetectorConfig {
    DetectorConfig {
        timeout_ms: 1000,
        ipv4,
        ipv6,
        ..DetectorConfig::default()
    }
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_falls_back_to_second_endpoint() {
    let server = MockServer::start().await;
    mount(&server, "/v4/primary", ResponseTemplate::new(500)).await;
    mount(
        &server,
        "/v4/backup",
        ResponseTemplate::new(200).set_body_string("203.0.113.7\n"),
    )
    .await;
    mount(
        &server,
        "/v6/primary",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"ip": "2001:db8::1"})),
    )
    .await;

    let config = detector_config(
        vec![
            Endpoint::text(format!("{}/v4/primary", server.uri())),
            Endpoint::text(format!("{}/v4/backup", server.uri())),
        ],
        vec![Endpoint::json(format!("{}/v6/primary", server.uri()))],
    );

    let result = Detector::new(config).unwrap().detect(Some("test")).await;

    assert_eq!(result.ipv4.as_deref(), Some("203.0.113.7"));
    assert_eq!(result.ipv6.as_deref(), Some("2001:db8::1"));
    assert_eq!(result.platform, "test");

    let v4_paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.url.path().to_string())
        .filter(|path| path.starts_with("/v4/"))
        .collect();
    assert_eq!(v4_paths, vec!["/v4/primary", "/v4/backup"]);
}

#[tokio::test]
async fn test_stops_after_first_answer() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/v4/primary",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({"ip": "198.51.100.4"})),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/v4/backup"))
        .respond_with(ResponseTemplate::new(200).set_body_string("198.51.100.5"))
        .expect(0)
        .mount(&server)
        .await;

    let config = detector_config(
        vec![
            Endpoint::json(format!("{}/v4/primary", server.uri())),
            Endpoint::text(format!("{}/v4/backup", server.uri())),
        ],
        Vec::new(),
    );

    let result = Detector::new(config).unwrap().detect(None).await;

    assert_eq!(result.ipv4.as_deref(), Some("198.51.100.4"));
    assert_eq!(result.ipv6, None);
    assert_eq!(result.platform, "unknown");
}

#[tokio::test]
async fn test_family_failure_is_not_an_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        "/v4",
        ResponseTemplate::new(200).set_body_string("192.0.2.10"),
    )
    .await;
    mount(&server, "/v6/primary", ResponseTemplate::new(502)).await;
    mount(
        &server,
        "/v6/backup",
        ResponseTemplate::new(200).set_body_string("{\"ip\":"),
    )
    .await;

    let config = detector_config(
        vec![Endpoint::text(format!("{}/v4", server.uri()))],
        vec![
            Endpoint::text(format!("{}/v6/primary", server.uri())),
            Endpoint::json(format!("{}/v6/backup", server.uri())),
        ],
    );
    let detector = Detector::new(config).unwrap();

    let response = handle_request(&detector, "azure-functions").await;
    assert_eq!(response.status, StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(body.as_object().unwrap().len(), 5);
    assert_eq!(body["ipv4"], "192.0.2.10");
    assert!(body["ipv6"].is_null());
    assert_eq!(body["platform"], "azure-functions");
    assert!(body["detectionTimeMs"].is_u64());
}

#[tokio::test]
async fn test_wrong_family_answers_are_dropped() {
    let server = MockServer::start().await;
    // A dual-stack service answering over the "wrong" family
    mount(
        &server,
        "/v4",
        ResponseTemplate::new(200).set_body_string("2001:db8::7"),
    )
    .await;
    mount(
        &server,
        "/v6",
        ResponseTemplate::new(200).set_body_string("203.0.113.7"),
    )
    .await;

    let config = detector_config(
        vec![Endpoint::text(format!("{}/v4", server.uri()))],
        vec![Endpoint::text(format!("{}/v6", server.uri()))],
    );

    let result = Detector::new(config).unwrap().detect(Some("vercel")).await;

    assert_eq!(result.ipv4, None);
    assert_eq!(result.ipv6, None);
}

#[tokio::test]
async fn test_slow_endpoints_are_bounded_by_timeout() {
    let server = MockServer::start().await;
    let slow = ResponseTemplate::new(200)
        .set_body_string("203.0.113.7")
        .set_delay(Duration::from_secs(5));
    mount(&server, "/slow/a", slow.clone()).await;
    mount(&server, "/slow/b", slow).await;
    mount(
        &server,
        "/fast",
        ResponseTemplate::new(200).set_body_string("2001:db8::1"),
    )
    .await;

    let config = DetectorConfig {
        timeout_ms: 150,
        ipv4: vec![
            Endpoint::text(format!("{}/slow/a", server.uri())),
            Endpoint::text(format!("{}/slow/b", server.uri())),
        ],
        ipv6: vec![Endpoint::text(format!("{}/fast", server.uri()))],
        ..DetectorConfig::default()
    };

    let result = Detector::new(config).unwrap().detect(Some("local")).await;

    assert_eq!(result.ipv4, None);
    assert_eq!(result.ipv6.as_deref(), Some("2001:db8::1"));
    // Two timeouts of 150ms plus scheduling overhead, far below the 5s delay
    assert!(result.detection_time_ms >= 300, "{}", result.detection_time_ms);
    assert!(result.detection_time_ms < 2000, "{}", result.detection_time_ms);
}
