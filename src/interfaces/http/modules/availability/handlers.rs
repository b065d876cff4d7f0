//! Availability search and quote HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::availability::{self, AvailabilityEngine};
use crate::domain::{BookingWindow, DomainError, RepositoryProvider};
use crate::interfaces::http::common::{domain_error_response, ApiResponse};

use super::dto::*;

/// Application state for availability handlers.
#[derive(Clone)]
pub struct AvailabilityAppState {
    pub engine: Arc<AvailabilityEngine>,
    pub repos: Arc<dyn RepositoryProvider>,
}

#[utoipa::path(
    get,
    path = "/api/v1/unit-types/{unit_type_id}/availability",
    tag = "Availability",
    params(
        ("unit_type_id" = i32, Path, description = "Unit type ID"),
        AvailabilityQuery
    ),
    responses(
        (status = 200, description = "Free unit count", body = ApiResponse<AvailabilityDto>),
        (status = 400, description = "Malformed window"),
        (status = 404, description = "Unknown unit type")
    )
)]
pub async fn check_availability(
    State(state): State<AvailabilityAppState>,
    Path(unit_type_id): Path<i32>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailabilityDto>>, (StatusCode, Json<ApiResponse<AvailabilityDto>>)> {
    let available = state
        .engine
        .check_availability(unit_type_id, query.start, query.end, query.party_size)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(AvailabilityDto {
        unit_type_id,
        available,
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/availability",
    tag = "Availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Availability across all active unit types; undersized ones omitted", body = ApiResponse<Vec<UnitTypeAvailabilityDto>>),
        (status = 400, description = "Malformed window")
    )
)]
pub async fn search_availability(
    State(state): State<AvailabilityAppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<
    Json<ApiResponse<Vec<UnitTypeAvailabilityDto>>>,
    (StatusCode, Json<ApiResponse<Vec<UnitTypeAvailabilityDto>>>),
> {
    let results = state
        .engine
        .search(query.start, query.end, query.party_size)
        .await
        .map_err(domain_error_response)?;

    let dtos: Vec<UnitTypeAvailabilityDto> = results
        .into_iter()
        .map(UnitTypeAvailabilityDto::from)
        .collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/unit-types/{unit_type_id}/quote",
    tag = "Availability",
    params(
        ("unit_type_id" = i32, Path, description = "Meeting room unit type ID"),
        QuoteQuery
    ),
    responses(
        (status = 200, description = "Hire quote", body = ApiResponse<QuoteDto>),
        (status = 404, description = "Unknown unit type"),
        (status = 422, description = "Unit type is not a meeting room")
    )
)]
pub async fn quote_unit_type(
    State(state): State<AvailabilityAppState>,
    Path(unit_type_id): Path<i32>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<ApiResponse<QuoteDto>>, (StatusCode, Json<ApiResponse<QuoteDto>>)> {
    let window = BookingWindow::new(query.start, query.end).map_err(domain_error_response)?;

    let unit_type = state
        .repos
        .unit_types()
        .find_by_id(unit_type_id)
        .await
        .map_err(domain_error_response)?
        .ok_or(DomainError::NotFound {
            entity: "UnitType",
            field: "id",
            value: unit_type_id.to_string(),
        })
        .map_err(domain_error_response)?;

    let total_cents =
        availability::quote(&unit_type, &window).map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(QuoteDto {
        unit_type_id,
        window_start: window.start().to_rfc3339(),
        window_end: window.end().to_rfc3339(),
        // quote() guarantees the rate exists for meeting rooms
        hourly_rate_cents: unit_type.hourly_rate_cents().unwrap_or(0),
        total_cents,
    })))
}

// ── Tests ──────────────────────────────────────────────────────
