//! HTTP surface of the provisioning service.
//!
//! - `POST /api/services`      body `{type, portExposed}` -> 201 + Service
//! - `GET  /api/services/{id}` -> 200 + Service

use crate::core::provisioning::ProvisioningService;
use crate::core::{ProcessLauncher, ServiceStore};
use crate::domain::model::{NewService, Service, ServiceId};
use crate::utils::error::OrbitError;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;

pub fn router<L, S>(service: Arc<ProvisioningService<L, S>>) -> Router
where
    L: ProcessLauncher + 'static,
    S: ServiceStore + 'static,
{
    let services = Router::new()
        .route("/services", post(create_service::<L, S>))
        .route("/services/{id}", get(get_service::<L, S>))
        .with_state(service);

    Router::new()
        .nest("/api", services)
        .route("/health", get(health))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn get_service<L, S>(
    State(service): State<Arc<ProvisioningService<L, S>>>,
    Path(id): Path<String>,
) -> Result<Json<Service>, OrbitError>
where
    L: ProcessLauncher + 'static,
    S: ServiceStore + 'static,
{
    let id: ServiceId = id.parse()?;
    let found = service.get(id).await?;
    Ok(Json(found))
}

async fn create_service<L, S>(
    State(service): State<Arc<ProvisioningService<L, S>>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Service>), OrbitError>
where
    L: ProcessLauncher + 'static,
    S: ServiceStore + 'static,
{
    let request: NewService = serde_json::from_slice(&body).map_err(|e| {
        OrbitError::validation("body", &String::from_utf8_lossy(&body), format!("Invalid JSON: {}", e))
    })?;

    let created = service.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

pub fn status_for(err: &OrbitError) -> StatusCode {
    match err {
        OrbitError::ValidationError { .. } => StatusCode::BAD_REQUEST,
        OrbitError::NotFound { .. } => StatusCode::NOT_FOUND,
        OrbitError::LaunchFailed { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for OrbitError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "request failed");
        } else {
            tracing::debug!(kind = self.kind(), error = %self, "request rejected");
        }

        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
