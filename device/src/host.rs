use std::{io::ErrorKind, net::SocketAddr, path::Path, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use thermostat_common::{ActionRequest, ActionResponse, DeviceConfig};
use tokio::{net::TcpListener, sync::Mutex};
use tracing::{debug, info, warn};

use crate::{actions, state::DeviceState};

#[derive(Clone)]
struct AppState {
    device: Arc<Mutex<DeviceState>>,
}

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = match std::env::var("DEVICE_CONFIG") {
        Ok(path) => load_config(Path::new(&path)).await.unwrap_or_else(|err| {
            warn!("failed to load device config from {path}: {err:#}");
            DeviceConfig::default()
        }),
        Err(_) => DeviceConfig::default(),
    };
    if let Some(port) = std::env::var("DEVICE_HTTP_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
    {
        config.listen_port = port;
    }
    config.sanitize();

    let app_state = AppState {
        device: Arc::new(Mutex::new(DeviceState::new(
            &config,
            Utc::now().timestamp(),
        ))),
    };
    spawn_sample_loop(app_state.clone(), &config);

    let app = router(app_state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind device server at {addr}"))?;

    info!("simulated device listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn load_config(path: &Path) -> anyhow::Result<DeviceConfig> {
    match tokio::fs::read(path).await {
        Ok(raw) => serde_json::from_slice::<DeviceConfig>(&raw)
            .with_context(|| format!("malformed device config {}", path.display())),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(DeviceConfig::default()),
        Err(err) => Err(err.into()),
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", post(handle_actions))
        .route("/actions", post(handle_actions))
        .with_state(state)
}

/// Drifts the readings around their starting point the way a live sensor would.
fn spawn_sample_loop(app_state: AppState, config: &DeviceConfig) {
    let base_temperature = config.initial_temperature;
    let base_humidity = config.initial_humidity;
    let period = Duration::from_secs(config.sample_interval_secs);

    tokio::spawn(async move {
        let mut tick: u64 = 0;
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;
            tick = tick.saturating_add(1);

            let temperature = base_temperature + ((tick % 8) as f64 * 0.2);
            let humidity = base_humidity + ((tick % 6) as f64 * 0.5);

            let mut device = app_state.device.lock().await;
            device.record_sample(temperature, humidity, Utc::now().timestamp());
            debug!(temperature, humidity, "recorded sample");
        }
    });
}

async fn handle_actions(
    State(state): State<AppState>,
    Json(request): Json<ActionRequest>,
) -> Json<ActionResponse> {
    let response = {
        let mut device = state.device.lock().await;
        actions::perform(&mut device, &request)
    };
    if let Some(error) = response.error.as_deref() {
        warn!("action request failed: {error}");
    }
    Json(response)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[tokio::test]
    async fn serves_actions_on_root_and_actions_path() {
        let config = DeviceConfig::default();
        let state = AppState {
            device: Arc::new(Mutex::new(DeviceState::new(&config, 0))),
        };
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });

        let client = reqwest::Client::new();
        let body: Value = client
            .post(format!("http://{addr}/"))
            .json(&json!({ "actions": [{ "setRequiredTemperature": 23 }] }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], json!("success"));

        let body: Value = client
            .post(format!("http://{addr}/actions"))
            .json(&json!({ "actions": ["getRequiredTemperature"] }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["data"]["getRequiredTemperature"], json!(23.0));
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let config = DeviceConfig::default();
        let state = AppState {
            device: Arc::new(Mutex::new(DeviceState::new(&config, 0))),
        };
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/"))
            .header("content-type", "application/json")
            .body("{\"actions\": 5}")
            .send()
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
