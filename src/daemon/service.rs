use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Settings;
use crate::detector::Detector;
use crate::response::{handle_request, HttpResponse};

#[derive(Clone)]
struct AppState {
    detector: Detector,
    platform: Arc<str>,
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

/// `GET /` answers with the detection response for `platform`.
pub fn router(detector: Detector, platform: &str) -> Router {
    Router::new()
        .route("/", get(detect_handler))
        .with_state(AppState {
            detector,
            platform: Arc::from(platform),
        })
}

async fn detect_handler(State(state): State<AppState>) -> HttpResponse {
    handle_request(&state.detector, &state.platform).await
}

pub async fn run(settings: Settings, platform: String) -> Result<()> {
    let addr = settings.bind_addr()?;
    let detector =
        Detector::new(settings.detector.clone()).context("Failed to create egress IP detector")?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        "Serving egress IP detection for {} on {} ({} IPv4 / {} IPv6 endpoints, {}ms timeout)",
        platform,
        addr,
        settings.detector.ipv4.len(),
        settings.detector.ipv6.len(),
        settings.detector.timeout_ms
    );

    axum::serve(listener, router(detector, &platform))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = wait_for_shutdown().await {
        error!("Error waiting for shutdown signal: {}", e);
    }
    info!("Shutdown signal received, stopping server");
}

async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM");
            }
            _ = sigint.recv() => {
                info!("Received SIGINT");
            }
        }
    }

    #[cfg(windows)]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C");
    }

    Ok(())
}
