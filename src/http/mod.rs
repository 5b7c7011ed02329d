//! HTTP API consumed by the dashboard.
//!
//! - `GET /api/status`: current status snapshot
//! - `POST /api/control`: `{"action": "open" | "close"}`

use crate::control::CommandGateway;
use crate::error::BridgeError;
use crate::sensors::SensorStore;
use crate::status::{Labels, StatusSnapshot, compute_snapshot};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{info, warn};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SensorStore>,
    pub gateway: Arc<CommandGateway>,
    pub labels: Labels,
}

#[derive(Debug, Serialize)]
struct ControlResponse {
    status: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Error response with a JSON `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn from_bridge(err: &BridgeError, labels: &Labels) -> Self {
        let (status, message) = match err {
            BridgeError::InvalidCommand(_) => {
                (StatusCode::BAD_REQUEST, labels.invalid_command.to_string())
            }
            BridgeError::Publish(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, labels.publish_failed.to_string())
            }
            BridgeError::IoError(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/control", post(control_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until `shutdown` resolves.
pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> crate::error::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("[HTTP] Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn status_handler(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(compute_snapshot(&state.store.readings(), &state.labels))
}

async fn control_handler(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<ControlResponse>, ApiError> {
    let action = match &payload {
        Ok(Json(body)) => body.get("action").and_then(serde_json::Value::as_str),
        Err(rejection) => {
            warn!("[HTTP] Rejected control body: {}", rejection.body_text());
            None
        }
    };

    let Some(action) = action else {
        return Err(ApiError::from_bridge(
            &BridgeError::InvalidCommand(String::new()),
            &state.labels,
        ));
    };

    match state.gateway.submit(action) {
        Ok(accepted) => Ok(Json(ControlResponse {
            status: accepted.message,
        })),
        Err(e) => {
            warn!("[HTTP] Control request failed: {}", e);
            Err(ApiError::from_bridge(&e, &state.labels))
        }
    }
}
