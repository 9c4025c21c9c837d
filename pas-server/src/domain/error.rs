//! Domain error types.
//!
//! These errors represent validation failures on user-supplied filter
//! values. They are distinct from API/IO errors.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Radius outside the discrete set offered by the filter slider
    #[error("invalid radius {0} km: must be one of 5, 10, 15, 20, 25")]
    InvalidRadius(u32),

    /// Availability flag other than 0 or 1
    #[error("invalid availability flag {0}: must be 0, 1 or null")]
    InvalidAvailability(u8),
}
