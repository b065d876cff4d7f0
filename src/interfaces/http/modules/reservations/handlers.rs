//! Reservation HTTP handlers
//!
//! Thin translation between HTTP and the availability engine: the engine
//! owns every capacity decision, these handlers only map inputs and
//! outcomes (201 / 400 / 404 / 409 / 422).

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::availability::AvailabilityEngine;
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::{
    domain_error_response, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};

use super::dto::*;

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationAppState {
    pub engine: Arc<AvailabilityEngine>,
    pub repos: Arc<dyn RepositoryProvider>,
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations",
    tag = "Reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation admitted", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Malformed window"),
        (status = 404, description = "Unknown unit type"),
        (status = 409, description = "capacity_exceeded (final) or admission_race (retryable)"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationAppState>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<ReservationDto>>),
    (StatusCode, Json<ApiResponse<ReservationDto>>),
> {
    let reservation = state
        .engine
        .admit(
            request.unit_type_id,
            request.window_start,
            request.window_end,
            request.party_size,
        )
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReservationDto::from(reservation))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    params(PaginationParams),
    responses(
        (status = 200, description = "Reservations page", body = ApiResponse<PaginatedResponse<ReservationDto>>)
    )
)]
pub async fn list_reservations(
    State(state): State<ReservationAppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<
    Json<ApiResponse<PaginatedResponse<ReservationDto>>>,
    (StatusCode, Json<ApiResponse<PaginatedResponse<ReservationDto>>>),
> {
    let (page, limit) = pagination.clamped();
    let (reservations, total) = state
        .repos
        .reservations()
        .find_page(page, limit)
        .await
        .map_err(domain_error_response)?;

    let items: Vec<ReservationDto> = reservations.into_iter().map(ReservationDto::from).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/unit-types/{unit_type_id}/reservations",
    tag = "Reservations",
    params(("unit_type_id" = i32, Path, description = "Unit type ID")),
    responses(
        (status = 200, description = "All reservations of the unit type, any status", body = ApiResponse<Vec<ReservationDto>>)
    )
)]
pub async fn list_reservations_for_unit_type(
    State(state): State<ReservationAppState>,
    Path(unit_type_id): Path<i32>,
) -> Result<
    Json<ApiResponse<Vec<ReservationDto>>>,
    (StatusCode, Json<ApiResponse<Vec<ReservationDto>>>),
> {
    let reservations = state
        .repos
        .reservations()
        .find_by_unit_type(unit_type_id)
        .await
        .map_err(domain_error_response)?;

    let dtos: Vec<ReservationDto> = reservations.into_iter().map(ReservationDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/{reservation_id}",
    tag = "Reservations",
    params(("reservation_id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationAppState>,
    Path(reservation_id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, (StatusCode, Json<ApiResponse<ReservationDto>>)> {
    let reservation = state
        .repos
        .reservations()
        .find_by_id(&reservation_id)
        .await
        .map_err(domain_error_response)?;

    let Some(reservation) = reservation else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!(
                "not_found: reservation {} not found",
                reservation_id
            ))),
        ));
    };

    Ok(Json(ApiResponse::success(ReservationDto::from(reservation))))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{reservation_id}/confirm",
    tag = "Reservations",
    params(("reservation_id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation confirmed", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Reservation is cancelled")
    )
)]
pub async fn confirm_reservation(
    State(state): State<ReservationAppState>,
    Path(reservation_id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, (StatusCode, Json<ApiResponse<ReservationDto>>)> {
    let reservation = state
        .engine
        .confirm(&reservation_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(ReservationDto::from(reservation))))
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/{reservation_id}/cancel",
    tag = "Reservations",
    params(("reservation_id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation cancelled (idempotent)", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn cancel_reservation(
    State(state): State<ReservationAppState>,
    Path(reservation_id): Path<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, (StatusCode, Json<ApiResponse<ReservationDto>>)> {
    let reservation = state
        .engine
        .cancel(&reservation_id)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(ReservationDto::from(reservation))))
}

// ── Tests ──────────────────────────────────────────────────────
