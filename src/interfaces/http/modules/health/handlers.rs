//! Health check handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use utoipa::ToSchema;

use crate::interfaces::http::common::ApiResponse;

/// Application state for health handlers.
#[derive(Clone)]
pub struct HealthAppState {
    pub db: DatabaseConnection,
}

/// Health status payload
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service healthy", body = ApiResponse<HealthStatus>),
        (status = 503, description = "Database unreachable")
    )
)]
pub async fn health_check(
    State(state): State<HealthAppState>,
) -> Result<Json<ApiResponse<HealthStatus>>, (StatusCode, Json<ApiResponse<HealthStatus>>)> {
    match state.db.ping().await {
        Ok(()) => Ok(Json(ApiResponse::success(HealthStatus {
            status: "ok",
            database: "ok",
        }))),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::error(format!("database unreachable: {}", e))),
        )),
    }
}
