use std::{
    collections::HashMap,
    io::ErrorKind,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thermostat_common::{BridgeConfig, DisplayUnits};
use tokio::{
    net::TcpListener,
    sync::{broadcast, oneshot},
};
use tracing::{info, warn};

use crate::{
    client::HttpDeviceClient,
    error::Error,
    notify::{BroadcastNotifier, Change},
    proxy::DeviceProxy,
};

#[derive(Clone)]
struct AppState {
    proxy: DeviceProxy,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct ValueBody<T> {
    value: T,
}

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config_path = std::env::var("BRIDGE_CONFIG").ok().map(PathBuf::from);
    let mut config = match config_path.as_deref() {
        Some(path) => load_config(path).await.unwrap_or_else(|err| {
            warn!("failed to load bridge config from {}: {err:#}", path.display());
            BridgeConfig::default()
        }),
        None => BridgeConfig::default(),
    };
    apply_env_overrides(&mut config);
    config.sanitize();
    if config.device_address.is_empty() {
        return Err(Error::InvalidConfig("device address is empty".to_string()).into());
    }

    let notifier = BroadcastNotifier::new(64);
    spawn_change_log(notifier.subscribe());

    let transport = HttpDeviceClient::new(config.device_url());
    info!("forwarding to device at {}", transport.base_url());

    let proxy = DeviceProxy::new(
        config.name.clone(),
        Arc::new(transport),
        Arc::new(notifier),
        config.target,
        config.display_units,
    );
    let app = router(AppState { proxy });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.listen_port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind bridge server at {addr}"))?;

    info!("{} bridge listening on http://{addr}", config.name);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn load_config(path: &Path) -> anyhow::Result<BridgeConfig> {
    match tokio::fs::read(path).await {
        Ok(raw) => serde_json::from_slice::<BridgeConfig>(&raw)
            .with_context(|| format!("malformed bridge config {}", path.display())),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(BridgeConfig::default()),
        Err(err) => Err(err.into()),
    }
}

fn apply_env_overrides(config: &mut BridgeConfig) {
    if let Ok(name) = std::env::var("BRIDGE_NAME") {
        config.name = name;
    }
    if let Ok(address) = std::env::var("DEVICE_ADDRESS") {
        config.device_address = address;
    }
    if let Some(port) = std::env::var("BRIDGE_HTTP_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
    {
        config.listen_port = port;
    }
}

fn spawn_change_log(mut changes: broadcast::Receiver<Change>) {
    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(Change::Attribute { attribute, value }) => {
                    info!("{} changed to {value}", attribute.as_str());
                }
                Ok(Change::Mode(mode)) => {
                    info!("mode is {}", mode.as_str());
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("change log lagged, skipped {skipped} notifications");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(handle_get_status))
        .route(
            "/api/target",
            get(handle_get_target).post(handle_set_target),
        )
        .route("/api/temperature", get(handle_get_temperature))
        .route("/api/humidity", get(handle_get_humidity))
        .route("/api/mode", get(handle_get_mode))
        .route("/api/units", get(handle_get_units).post(handle_set_units))
        .with_state(state)
}

async fn handle_get_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.proxy.status())
}

async fn handle_get_target(State(state): State<AppState>) -> axum::response::Response {
    let (ack, answer) = oneshot::channel();
    state.proxy.get_target_temperature(ack);
    respond(answer).await
}

async fn handle_set_target(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    let Some(value) = params.get("value") else {
        return error_response(StatusCode::BAD_REQUEST, "Missing 'value' parameter");
    };
    let Ok(target) = value.parse::<f64>() else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid temperature value");
    };

    let (ack, answer) = oneshot::channel();
    if let Err(err) = state.proxy.set_target_temperature(target, ack) {
        return error_response(StatusCode::BAD_REQUEST, &err.to_string());
    }
    respond(answer).await
}

async fn handle_get_temperature(State(state): State<AppState>) -> axum::response::Response {
    let (ack, answer) = oneshot::channel();
    state.proxy.get_current_temperature(ack);
    respond(answer).await
}

async fn handle_get_humidity(State(state): State<AppState>) -> axum::response::Response {
    let (ack, answer) = oneshot::channel();
    state.proxy.get_current_humidity(ack);
    respond(answer).await
}

async fn handle_get_mode(State(state): State<AppState>) -> axum::response::Response {
    let (ack, answer) = oneshot::channel();
    state.proxy.get_mode(ack);
    match answer.await {
        Ok(mode) => Json(ValueBody {
            value: mode.as_str(),
        })
        .into_response(),
        Err(_) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "No answer"),
    }
}

async fn handle_get_units(State(state): State<AppState>) -> axum::response::Response {
    let (ack, answer) = oneshot::channel();
    state.proxy.get_display_units(ack);
    respond_units(answer).await
}

async fn handle_set_units(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    let Some(value) = params.get("value") else {
        return error_response(StatusCode::BAD_REQUEST, "Missing 'value' parameter");
    };
    let Some(units) = DisplayUnits::parse(value) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Invalid units. Use 'CELSIUS' or 'FAHRENHEIT'",
        );
    };

    let (ack, answer) = oneshot::channel();
    state.proxy.set_display_units(units, ack);
    respond_units(answer).await
}

async fn respond(answer: oneshot::Receiver<f64>) -> axum::response::Response {
    match answer.await {
        Ok(value) => Json(ValueBody { value }).into_response(),
        Err(_) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "No answer"),
    }
}

async fn respond_units(answer: oneshot::Receiver<DisplayUnits>) -> axum::response::Response {
    match answer.await {
        Ok(units) => Json(ValueBody {
            value: units.as_str(),
        })
        .into_response(),
        Err(_) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "No answer"),
    }
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}
