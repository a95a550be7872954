//! # Database Error Types
//!
//! Error types for database operations and purchase outcomes.
//!
//! ## Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Error Propagation                             │
//! │                                                                     │
//! │  SQLite error (sqlx::Error)                                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  DbError (this module)  ← categorized: constraint kind, busy,       │
//! │       │                   connection; is_transient() classifies     │
//! │       │                   retryable vs fatal                        │
//! │       ▼                                                             │
//! │  PurchaseError          ← expected business outcomes are their own  │
//! │       │                   variants, never buried in Storage         │
//! │       ▼                                                             │
//! │  CLI maps to user-facing messages and re-prompts                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use shopfloor_core::ValidationError;

/// Database operation errors.
///
/// These wrap sqlx errors and add categorization. Business outcomes (product
/// missing, stock short, product in use) are NOT here - they are values or
/// dedicated variants on the operation that produces them.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database connection failed (file unreachable, permissions, disk full).
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Unique constraint violation.
    #[error("Duplicate {field}: value already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a purchase for a customer id that does not exist
    /// - Any other dangling reference
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation (e.g. the stock_quantity >= 0 backstop).
    #[error("Check constraint violation: {message}")]
    CheckViolation { message: String },

    /// Another writer held the database lock past the busy timeout.
    #[error("Database busy: lock wait timed out")]
    Busy,

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Whether the operation may succeed if simply retried.
    ///
    /// Lock contention and pool pressure are transient; constraint violations
    /// and migration failures are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DbError::Busy | DbError::PoolExhausted | DbError::ConnectionFailed(_)
        )
    }
}

/// Convert sqlx errors to DbError.
///
/// SQLite reports constraint failures as database errors with a message
/// prefix; the mapping below keys off those prefixes.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message().to_string();

                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation { message: msg }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation { message: msg }
                } else if msg.contains("database is locked") || msg.contains("database table is locked") {
                    DbError::Busy
                } else {
                    DbError::QueryFailed(msg)
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Purchase Outcomes
// =============================================================================

/// The closed set of ways a purchase transaction can fail.
///
/// The first three variants are expected business outcomes, not faults: the
/// caller shows them to the user and carries on. Only [`PurchaseError::Storage`]
/// represents an actual failure, and its [`DbError::is_transient`] tells the
/// caller whether a retry is worthwhile.
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// No product row with the given id.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Stock cannot cover the requested quantity.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    /// Quantity was zero or negative. Rejected before any storage interaction.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// The transaction itself failed; everything was rolled back.
    #[error(transparent)]
    Storage(#[from] DbError),
}

// =============================================================================
// Product Administration Outcomes
// =============================================================================

/// Errors from adding a product to the catalog.
#[derive(Debug, Error)]
pub enum AddProductError {
    /// Name/price/stock failed validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] DbError),
}

/// Result of a product deletion attempt.
///
/// `InUse` and `NotFound` are reported as values, not errors: refusing to
/// delete a product referenced by the ledger is deliberate policy, and the
/// CLI tells the user rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Product removed from the catalog.
    Deleted,
    /// At least one purchase line references the product; deletion refused to
    /// preserve purchase-history integrity.
    InUse,
    /// No product row with the given id.
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(DbError::Busy.is_transient());
        assert!(DbError::PoolExhausted.is_transient());
        assert!(DbError::ConnectionFailed("gone".to_string()).is_transient());

        assert!(!DbError::MigrationFailed("bad sql".to_string()).is_transient());
        assert!(!DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".to_string()
        }
        .is_transient());
    }

    #[test]
    fn test_purchase_error_messages() {
        let err = PurchaseError::InsufficientStock {
            product_id: 1,
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 1: available 2, requested 3"
        );

        assert_eq!(
            PurchaseError::ProductNotFound(9).to_string(),
            "Product not found: 9"
        );
    }
}
