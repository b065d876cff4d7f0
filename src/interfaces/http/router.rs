//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::availability::AvailabilityEngine;
use crate::domain::RepositoryProvider;
use crate::notifications::SharedEventBus;

use super::modules::availability::{self, AvailabilityAppState};
use super::modules::events::{ws_events_handler, NotificationState};
use super::modules::health::{self, HealthAppState};
use super::modules::metrics::{self, MetricsAppState};
use super::modules::reservations::{self, ReservationAppState};
use super::modules::unit_types::{self, CatalogAppState};

/// Unified state for all booking routes. Axum extracts the specific
/// handler state via `FromRef`.
#[derive(Clone)]
pub struct BookingUnifiedState {
    pub engine: Arc<AvailabilityEngine>,
    pub repos: Arc<dyn RepositoryProvider>,
    pub event_bus: SharedEventBus,
    pub db: DatabaseConnection,
    pub prometheus: PrometheusHandle,
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<BookingUnifiedState> for CatalogAppState {
    fn from_ref(s: &BookingUnifiedState) -> Self {
        CatalogAppState {
            repos: Arc::clone(&s.repos),
            event_bus: s.event_bus.clone(),
        }
    }
}

impl FromRef<BookingUnifiedState> for ReservationAppState {
    fn from_ref(s: &BookingUnifiedState) -> Self {
        ReservationAppState {
            engine: Arc::clone(&s.engine),
            repos: Arc::clone(&s.repos),
        }
    }
}

impl FromRef<BookingUnifiedState> for AvailabilityAppState {
    fn from_ref(s: &BookingUnifiedState) -> Self {
        AvailabilityAppState {
            engine: Arc::clone(&s.engine),
            repos: Arc::clone(&s.repos),
        }
    }
}

impl FromRef<BookingUnifiedState> for HealthAppState {
    fn from_ref(s: &BookingUnifiedState) -> Self {
        HealthAppState { db: s.db.clone() }
    }
}

impl FromRef<BookingUnifiedState> for MetricsAppState {
    fn from_ref(s: &BookingUnifiedState) -> Self {
        MetricsAppState {
            prometheus: s.prometheus.clone(),
        }
    }
}

impl FromRef<BookingUnifiedState> for NotificationState {
    fn from_ref(s: &BookingUnifiedState) -> Self {
        NotificationState {
            event_bus: s.event_bus.clone(),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Metrics
        metrics::handlers::render_metrics,
        // Unit types
        unit_types::handlers::create_unit_type,
        unit_types::handlers::list_unit_types,
        unit_types::handlers::get_unit_type,
        unit_types::handlers::deactivate_unit_type,
        // Availability
        availability::handlers::check_availability,
        availability::handlers::search_availability,
        availability::handlers::quote_unit_type,
        // Reservations
        reservations::handlers::create_reservation,
        reservations::handlers::list_reservations,
        reservations::handlers::list_reservations_for_unit_type,
        reservations::handlers::get_reservation,
        reservations::handlers::confirm_reservation,
        reservations::handlers::cancel_reservation,
    ),
    components(schemas(
        unit_types::dto::CreateUnitTypeRequest,
        unit_types::dto::UnitKindDto,
        unit_types::dto::UnitTypeDto,
        availability::dto::AvailabilityDto,
        availability::dto::UnitTypeAvailabilityDto,
        availability::dto::QuoteDto,
        reservations::dto::CreateReservationRequest,
        reservations::dto::ReservationDto,
        health::handlers::HealthStatus,
    )),
    tags(
        (name = "Health", description = "Liveness and database checks"),
        (name = "Metrics", description = "Prometheus exposition"),
        (name = "UnitTypes", description = "Bookable unit type catalog"),
        (name = "Availability", description = "Capacity search and quotes"),
        (name = "Reservations", description = "Admission, confirmation, cancellation"),
    ),
    info(
        title = "Roomly Booking API",
        description = "Room and meeting-room availability and admission control"
    )
)]
pub struct ApiDoc;

/// Build the API router with all routes, Swagger UI and middleware.
pub fn create_api_router(
    engine: Arc<AvailabilityEngine>,
    repos: Arc<dyn RepositoryProvider>,
    event_bus: SharedEventBus,
    db: DatabaseConnection,
    prometheus: PrometheusHandle,
) -> Router {
    let state = BookingUnifiedState {
        engine,
        repos,
        event_bus,
        db,
        prometheus,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health::handlers::health_check))
        .route("/metrics", get(metrics::handlers::render_metrics))
        .route(
            "/api/v1/unit-types",
            get(unit_types::handlers::list_unit_types)
                .post(unit_types::handlers::create_unit_type),
        )
        .route(
            "/api/v1/unit-types/{unit_type_id}",
            get(unit_types::handlers::get_unit_type),
        )
        .route(
            "/api/v1/unit-types/{unit_type_id}/deactivate",
            post(unit_types::handlers::deactivate_unit_type),
        )
        .route(
            "/api/v1/unit-types/{unit_type_id}/availability",
            get(availability::handlers::check_availability),
        )
        .route(
            "/api/v1/unit-types/{unit_type_id}/quote",
            get(availability::handlers::quote_unit_type),
        )
        .route(
            "/api/v1/unit-types/{unit_type_id}/reservations",
            get(reservations::handlers::list_reservations_for_unit_type),
        )
        .route(
            "/api/v1/availability",
            get(availability::handlers::search_availability),
        )
        .route(
            "/api/v1/reservations",
            get(reservations::handlers::list_reservations)
                .post(reservations::handlers::create_reservation),
        )
        .route(
            "/api/v1/reservations/{reservation_id}",
            get(reservations::handlers::get_reservation),
        )
        .route(
            "/api/v1/reservations/{reservation_id}/confirm",
            post(reservations::handlers::confirm_reservation),
        )
        .route(
            "/api/v1/reservations/{reservation_id}/cancel",
            post(reservations::handlers::cancel_reservation),
        )
        .route("/api/v1/events/ws", get(ws_events_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
