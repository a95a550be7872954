//! # Validation Error Types
//!
//! Input validation errors for shopfloor-core.
//!
//! These cover the first line of defense: values that are malformed before
//! any storage interaction happens. Storage failures and purchase outcomes
//! live in `shopfloor-db` (separate crate), next to the code that produces
//! them.
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, limits)
//! 3. Errors are enum variants, never bare strings

use thiserror::Error;

/// Input validation errors.
///
/// Raised before business logic runs; the presentation layer re-prompts on
/// these rather than aborting.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

/// Convenience alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;
