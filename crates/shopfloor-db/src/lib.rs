//! # shopfloor-db: Database Layer for Shopfloor
//!
//! SQLite storage for the storefront: catalog, customer roster, and the
//! purchase ledger, with the purchase transaction as the one genuinely
//! concurrency-sensitive operation.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Error taxonomy (storage failures vs business outcomes)
//! - [`repository`] - Repositories (product, customer, purchase)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopfloor_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./shopfloor.db")).await?;
//!
//! let receipt = db.purchases().purchase(customer_id, product_id, 3).await?;
//! println!("purchase {} total {}", receipt.purchase_id, receipt.total());
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{AddProductError, DbError, DeleteOutcome, PurchaseError};
pub use pool::{Database, DbConfig};

pub use repository::customer::CustomerRepository;
pub use repository::product::ProductRepository;
pub use repository::purchase::PurchaseRepository;

#[cfg(test)]
pub(crate) mod testutil {
    //! Shared helpers for repository tests.

    use crate::pool::{Database, DbConfig};

    /// Fresh in-memory database with migrations applied.
    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Temp-file database for tests that need multiple connections
    /// contending on the real write lock (`:memory:` cannot do that).
    pub async fn test_db_on_disk(tag: &str) -> (Database, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!(
            "shopfloor-test-{}-{}-{}.db",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        (db, path)
    }

    /// Inserts a customer and returns its generated id.
    pub async fn seed_customer(db: &Database, first: &str, last: &str) -> i64 {
        db.customers()
            .insert(first, last, &format!("{}@example.com", first.to_lowercase()))
            .await
            .unwrap()
    }

    /// Inserts a product and returns its generated id.
    pub async fn seed_product(db: &Database, name: &str, price_cents: i64, stock: i64) -> i64 {
        db.products()
            .insert(&shopfloor_core::NewProduct {
                name: name.to_string(),
                price_cents,
                stock_quantity: stock,
            })
            .await
            .unwrap()
    }
}
