//! Domain errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Invalid window: {0}")]
    InvalidWindow(String),

    #[error("No free unit of type {unit_type_id} for the requested window")]
    CapacityExceeded { unit_type_id: i32 },

    #[error("Admission for unit type {unit_type_id} exceeded the lock-wait budget")]
    AdmissionRace { unit_type_id: i32 },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Machine-readable reason code, stable across message wording changes.
    /// API clients branch on this (e.g. retry `admission_race` with backoff,
    /// never retry `capacity_exceeded`).
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidWindow(_) => "invalid_window",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::AdmissionRace { .. } => "admission_race",
            Self::Validation(_) => "validation",
            Self::Conflict(_) => "conflict",
            Self::Storage(_) => "storage",
        }
    }

    /// Whether this error is likely transient (e.g. DB connection lost)
    /// and the operation may succeed if retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::AdmissionRace { .. })
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contention_outcomes_have_distinct_reason_codes() {
        let capacity = DomainError::CapacityExceeded { unit_type_id: 1 };
        let race = DomainError::AdmissionRace { unit_type_id: 1 };
        assert_ne!(capacity.reason_code(), race.reason_code());
    }

    #[test]
    fn only_storage_and_race_are_transient() {
        assert!(DomainError::Storage("connection reset".into()).is_transient());
        assert!(DomainError::AdmissionRace { unit_type_id: 3 }.is_transient());
        assert!(!DomainError::CapacityExceeded { unit_type_id: 3 }.is_transient());
        assert!(!DomainError::InvalidWindow("end before start".into()).is_transient());
    }
}
