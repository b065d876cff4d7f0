//! Unit type catalog HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;

use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::{
    domain_error_response, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};
use crate::notifications::events::{Event, UnitTypeChangedEvent};
use crate::notifications::SharedEventBus;

use super::dto::*;

/// Application state for catalog handlers.
#[derive(Clone)]
pub struct CatalogAppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub event_bus: SharedEventBus,
}

#[utoipa::path(
    post,
    path = "/api/v1/unit-types",
    tag = "UnitTypes",
    request_body = CreateUnitTypeRequest,
    responses(
        (status = 201, description = "Unit type created", body = ApiResponse<UnitTypeDto>),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_unit_type(
    State(state): State<CatalogAppState>,
    ValidatedJson(request): ValidatedJson<CreateUnitTypeRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<UnitTypeDto>>),
    (StatusCode, Json<ApiResponse<UnitTypeDto>>),
> {
    let new = request.into_domain().map_err(domain_error_response)?;

    let unit_type = state
        .repos
        .unit_types()
        .insert(new)
        .await
        .map_err(domain_error_response)?;

    state
        .event_bus
        .publish(Event::UnitTypeChanged(UnitTypeChangedEvent {
            unit_type_id: unit_type.id,
            name: unit_type.name.clone(),
            is_active: true,
            timestamp: Utc::now(),
        }));

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UnitTypeDto::from(unit_type))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/unit-types",
    tag = "UnitTypes",
    params(PaginationParams),
    responses(
        (status = 200, description = "Unit types page", body = ApiResponse<PaginatedResponse<UnitTypeDto>>)
    )
)]
pub async fn list_unit_types(
    State(state): State<CatalogAppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<
    Json<ApiResponse<PaginatedResponse<UnitTypeDto>>>,
    (StatusCode, Json<ApiResponse<PaginatedResponse<UnitTypeDto>>>),
> {
    let (page, limit) = pagination.clamped();
    let (unit_types, total) = state
        .repos
        .unit_types()
        .find_page(page, limit)
        .await
        .map_err(domain_error_response)?;

    let items: Vec<UnitTypeDto> = unit_types.into_iter().map(UnitTypeDto::from).collect();
    Ok(Json(ApiResponse::success(PaginatedResponse::new(
        items, total, page, limit,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/unit-types/{unit_type_id}",
    tag = "UnitTypes",
    params(("unit_type_id" = i32, Path, description = "Unit type ID")),
    responses(
        (status = 200, description = "Unit type details", body = ApiResponse<UnitTypeDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_unit_type(
    State(state): State<CatalogAppState>,
    Path(unit_type_id): Path<i32>,
) -> Result<Json<ApiResponse<UnitTypeDto>>, (StatusCode, Json<ApiResponse<UnitTypeDto>>)> {
    let unit_type = state
        .repos
        .unit_types()
        .find_by_id(unit_type_id)
        .await
        .map_err(domain_error_response)?;

    let Some(unit_type) = unit_type else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!(
                "not_found: unit type {} not found",
                unit_type_id
            ))),
        ));
    };

    Ok(Json(ApiResponse::success(UnitTypeDto::from(unit_type))))
}

#[utoipa::path(
    post,
    path = "/api/v1/unit-types/{unit_type_id}/deactivate",
    tag = "UnitTypes",
    params(("unit_type_id" = i32, Path, description = "Unit type ID")),
    responses(
        (status = 200, description = "Unit type deactivated", body = ApiResponse<UnitTypeDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn deactivate_unit_type(
    State(state): State<CatalogAppState>,
    Path(unit_type_id): Path<i32>,
) -> Result<Json<ApiResponse<UnitTypeDto>>, (StatusCode, Json<ApiResponse<UnitTypeDto>>)> {
    state
        .repos
        .unit_types()
        .deactivate(unit_type_id)
        .await
        .map_err(domain_error_response)?;

    // Re-read for the response; the row just changed under us at worst.
    let unit_type = state
        .repos
        .unit_types()
        .find_by_id(unit_type_id)
        .await
        .map_err(domain_error_response)?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(format!(
                    "not_found: unit type {} not found",
                    unit_type_id
                ))),
            )
        })?;

    state
        .event_bus
        .publish(Event::UnitTypeChanged(UnitTypeChangedEvent {
            unit_type_id,
            name: unit_type.name.clone(),
            is_active: false,
            timestamp: Utc::now(),
        }));

    Ok(Json(ApiResponse::success(UnitTypeDto::from(unit_type))))
}
