//! Common API DTOs and helpers

pub mod validated_json;

pub use validated_json::ValidatedJson;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

/// Standard API response envelope.
///
/// All REST endpoints return data in this wrapper.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "error": "reason_code: description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Map a domain error to its HTTP status and response body.
///
/// The error string always starts with the machine-readable reason code,
/// so clients can distinguish `capacity_exceeded` (final, do not retry)
/// from `admission_race` (transient, retry with backoff) on the same 409.
pub fn domain_error_response<T>(err: DomainError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = match &err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::InvalidWindow(_) => StatusCode::BAD_REQUEST,
        DomainError::CapacityExceeded { .. } => StatusCode::CONFLICT,
        DomainError::AdmissionRace { .. } => StatusCode::CONFLICT,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = ApiResponse::error(format!("{}: {}", err.reason_code(), err));
    (status, Json(body))
}

/// Pagination parameters for list requests
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PaginationParams {
    /// Page number (1-based). Default: 1
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page (1-100). Default: 50
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    50
}

impl PaginationParams {
    /// Clamp to sane bounds before hitting the store.
    pub fn clamped(&self) -> (u64, u64) {
        (self.page.max(1), self.limit.clamp(1, 100))
    }
}

/// Paginated list response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    /// Items on the current page
    pub items: Vec<T>,
    /// Total item count across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u64,
    /// Page size
    pub limit: u64,
    /// Total page count
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        let total_pages = total.div_ceil(limit.max(1));
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_out_of_range_values() {
        let params = PaginationParams { page: 0, limit: 10_000 };
        assert_eq!(params.clamped(), (1, 100));
    }

    #[test]
    fn total_pages_rounds_up() {
        let resp: PaginatedResponse<u8> = PaginatedResponse::new(vec![], 101, 1, 50);
        assert_eq!(resp.total_pages, 3);
    }

    #[test]
    fn capacity_and_race_both_map_to_conflict_with_distinct_reasons() {
        let (status, body) =
            domain_error_response::<()>(DomainError::CapacityExceeded { unit_type_id: 1 });
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.error.as_deref().unwrap().starts_with("capacity_exceeded:"));

        let (status, body) =
            domain_error_response::<()>(DomainError::AdmissionRace { unit_type_id: 1 });
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.error.as_deref().unwrap().starts_with("admission_race:"));
    }

    #[test]
    fn invalid_window_maps_to_bad_request() {
        let (status, _) =
            domain_error_response::<()>(DomainError::InvalidWindow("end before start".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
