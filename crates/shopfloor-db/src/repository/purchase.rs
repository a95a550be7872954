//! # Purchase Repository
//!
//! The purchase transaction core, plus the ledger queries built on top of it.
//!
//! ## Transaction Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   purchase(customer, product, qty)                  │
//! │                                                                     │
//! │  qty <= 0 ──────────────────────────► InvalidQuantity (no storage)  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  BEGIN IMMEDIATE      ← write lock taken BEFORE the read            │
//! │       │                                                             │
//! │  SELECT price, stock ──── no row ───► rollback, ProductNotFound     │
//! │       │                                                             │
//! │  stock < qty ───────────────────────► rollback, InsufficientStock   │
//! │       │                                                             │
//! │  UPDATE products SET stock -= qty                                   │
//! │  INSERT purchases            → purchase_id (autoincrement)          │
//! │  INSERT purchase_items       → price snapshot from the SELECT       │
//! │       │                                                             │
//! │  COMMIT ────────────────────────────► Receipt                       │
//! │                                                                     │
//! │  any storage failure ───────────────► rollback (drop), Storage(..)  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why BEGIN IMMEDIATE
//! SQLite has no `SELECT ... FOR UPDATE`. A deferred transaction would take a
//! read snapshot and could fail to upgrade to the write lock when two
//! purchasers race. `BEGIN IMMEDIATE` acquires the write lock up front, so
//! the price/stock read below cannot be invalidated before the decrement
//! commits: at most one purchase proceeds past the stock check at a time.
//! The lock is database-wide rather than per-row; contending writers queue on
//! the busy timeout.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult, PurchaseError};
use shopfloor_core::{HistoryEntry, LedgerEntry, Receipt};

/// Repository for the purchase transaction and ledger reports.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Executes a single customer purchase as one atomic unit.
    ///
    /// Checks stock, decrements it, and records the purchase with the unit
    /// price snapshotted at lock-read time. Every abort path rolls back; no
    /// partial writes survive.
    ///
    /// ## Arguments
    /// * `customer_id` - assumed validated by the caller's session; an unknown
    ///   id surfaces as a foreign-key `Storage` error
    /// * `product_id` - target product
    /// * `quantity` - must be positive
    ///
    /// ## Errors
    /// [`PurchaseError::ProductNotFound`] and
    /// [`PurchaseError::InsufficientStock`] are expected outcomes;
    /// [`PurchaseError::Storage`] means the transaction failed and was rolled
    /// back ([`DbError::is_transient`] tells the caller whether to retry).
    ///
    /// ## Concurrency
    /// The write lock is database-wide, not per-product: concurrent purchases
    /// of *unrelated* products also serialize, queueing on the busy timeout
    /// (exceeded waits surface as [`DbError::Busy`]). See the module docs.
    pub async fn purchase(
        &self,
        customer_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> Result<Receipt, PurchaseError> {
        if quantity <= 0 {
            return Err(PurchaseError::InvalidQuantity(quantity));
        }

        debug!(customer_id, product_id, quantity, "Starting purchase");

        // Write lock first; see module docs. On any `?` below the transaction
        // is dropped un-committed, which rolls back.
        let mut tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(DbError::from)?;

        let row: Option<(i64, i64)> = sqlx::query_as(
            "SELECT price_cents, stock_quantity FROM products WHERE id = ?1",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DbError::from)?;

        let (price_at_purchase_cents, stock) = match row {
            Some(row) => row,
            None => {
                tx.rollback().await.map_err(DbError::from)?;
                return Err(PurchaseError::ProductNotFound(product_id));
            }
        };

        if stock < quantity {
            tx.rollback().await.map_err(DbError::from)?;
            return Err(PurchaseError::InsufficientStock {
                product_id,
                available: stock,
                requested: quantity,
            });
        }

        sqlx::query("UPDATE products SET stock_quantity = stock_quantity - ?1 WHERE id = ?2")
            .bind(quantity)
            .bind(product_id)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

        let purchase_date = Utc::now();
        let result = sqlx::query(
            "INSERT INTO purchases (purchase_date, customer_id, staff_id) VALUES (?1, ?2, NULL)",
        )
        .bind(purchase_date)
        .bind(customer_id)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;
        let purchase_id = result.last_insert_rowid();

        // Price from the locked read above, never re-read.
        sqlx::query(
            r#"
            INSERT INTO purchase_items (purchase_id, product_id, price_at_purchase_cents, quantity)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(purchase_id)
        .bind(product_id)
        .bind(price_at_purchase_cents)
        .bind(quantity)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;

        info!(purchase_id, customer_id, product_id, quantity, "Purchase committed");

        Ok(Receipt {
            purchase_id,
            product_id,
            quantity,
            price_at_purchase_cents,
        })
    }

    /// Purchase history for one customer, most recent first.
    ///
    /// Ordered by date descending, purchase id descending as the tie-break
    /// for same-date purchases.
    pub async fn history(&self, customer_id: i64) -> DbResult<Vec<HistoryEntry>> {
        let entries = sqlx::query_as::<_, HistoryEntry>(
            r#"
            SELECT
                pu.id AS purchase_id,
                pu.purchase_date,
                p.name AS product_name,
                pi.quantity,
                pi.price_at_purchase_cents
            FROM purchases pu
            JOIN purchase_items pi ON pi.purchase_id = pu.id
            JOIN products p ON p.id = pi.product_id
            WHERE pu.customer_id = ?1
            ORDER BY pu.purchase_date DESC, pu.id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Full purchase ledger across all customers, purchase id ascending.
    ///
    /// `total_cents` is computed in the query as
    /// `quantity * price_at_purchase_cents`.
    pub async fn ledger(&self) -> DbResult<Vec<LedgerEntry>> {
        let entries = sqlx::query_as::<_, LedgerEntry>(
            r#"
            SELECT
                pu.id AS purchase_id,
                pu.purchase_date,
                c.first_name || ' ' || c.last_name AS customer_name,
                p.name AS product_name,
                pi.quantity,
                pi.price_at_purchase_cents,
                pi.quantity * pi.price_at_purchase_cents AS total_cents
            FROM purchases pu
            JOIN customers c ON c.id = pu.customer_id
            JOIN purchase_items pi ON pi.purchase_id = pu.id
            JOIN products p ON p.id = pi.product_id
            ORDER BY pu.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seed_customer, seed_product, test_db, test_db_on_disk};

    async fn stock_of(db: &crate::Database, product_id: i64) -> i64 {
        db.products()
            .get_by_id(product_id)
            .await
            .unwrap()
            .unwrap()
            .stock_quantity
    }

    #[tokio::test]
    async fn test_purchase_happy_path() {
        let db = test_db().await;
        let customer = seed_customer(&db, "Ada", "Lovelace").await;
        let product = seed_product(&db, "Widget", 999, 5).await;

        let receipt = db.purchases().purchase(customer, product, 3).await.unwrap();

        assert_eq!(receipt.product_id, product);
        assert_eq!(receipt.quantity, 3);
        assert_eq!(receipt.price_at_purchase_cents, 999);
        assert_eq!(receipt.total().cents(), 2997);

        assert_eq!(stock_of(&db, product).await, 2);

        // A second purchase of 3 no longer fits.
        let err = db.purchases().purchase(customer, product, 3).await.unwrap_err();
        assert!(matches!(
            err,
            PurchaseError::InsufficientStock {
                available: 2,
                requested: 3,
                ..
            }
        ));
        assert_eq!(stock_of(&db, product).await, 2);
    }

    #[tokio::test]
    async fn test_purchase_exact_remaining_stock() {
        let db = test_db().await;
        let customer = seed_customer(&db, "Ada", "Lovelace").await;
        let product = seed_product(&db, "Widget", 500, 4).await;

        db.purchases().purchase(customer, product, 4).await.unwrap();
        assert_eq!(stock_of(&db, product).await, 0);
    }

    #[tokio::test]
    async fn test_purchase_unknown_product() {
        let db = test_db().await;
        let customer = seed_customer(&db, "Ada", "Lovelace").await;
        let product = seed_product(&db, "Widget", 999, 5).await;

        let err = db
            .purchases()
            .purchase(customer, product + 100, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, PurchaseError::ProductNotFound(_)));

        // Nothing changed anywhere.
        assert_eq!(stock_of(&db, product).await, 5);
        assert!(db.purchases().ledger().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_purchase_invalid_quantity_touches_no_storage() {
        let db = test_db().await;
        let customer = seed_customer(&db, "Ada", "Lovelace").await;
        let product = seed_product(&db, "Widget", 999, 5).await;

        for qty in [0, -1, -42] {
            let err = db.purchases().purchase(customer, product, qty).await.unwrap_err();
            assert!(matches!(err, PurchaseError::InvalidQuantity(q) if q == qty));
        }

        assert_eq!(stock_of(&db, product).await, 5);
        assert!(db.purchases().ledger().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_purchase_unknown_customer_rolls_back() {
        let db = test_db().await;
        let product = seed_product(&db, "Widget", 999, 5).await;

        // No customers exist; the purchases INSERT trips the FK constraint
        // after stock was already decremented inside the transaction.
        let err = db.purchases().purchase(777, product, 2).await.unwrap_err();
        assert!(matches!(
            err,
            PurchaseError::Storage(DbError::ForeignKeyViolation { .. })
        ));

        // The rollback undid the decrement.
        assert_eq!(stock_of(&db, product).await, 5);
        assert!(db.purchases().ledger().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_price_snapshot_survives_catalog_price_change() {
        let db = test_db().await;
        let customer = seed_customer(&db, "Ada", "Lovelace").await;
        let product = seed_product(&db, "Widget", 999, 10).await;

        db.purchases().purchase(customer, product, 1).await.unwrap();

        // Catalog price changes after the fact.
        sqlx::query("UPDATE products SET price_cents = 1500 WHERE id = ?1")
            .bind(product)
            .execute(db.pool())
            .await
            .unwrap();

        let receipt = db.purchases().purchase(customer, product, 1).await.unwrap();
        assert_eq!(receipt.price_at_purchase_cents, 1500);

        let history = db.purchases().history(customer).await.unwrap();
        assert_eq!(history.len(), 2);
        // Most recent first: the 1500-cent purchase, then the 999-cent one.
        assert_eq!(history[0].price_at_purchase_cents, 1500);
        assert_eq!(history[1].price_at_purchase_cents, 999);
    }

    #[tokio::test]
    async fn test_history_scoped_and_ordered() {
        let db = test_db().await;
        let ada = seed_customer(&db, "Ada", "Lovelace").await;
        let grace = seed_customer(&db, "Grace", "Hopper").await;
        let widget = seed_product(&db, "Widget", 999, 50).await;
        let gadget = seed_product(&db, "Gadget", 250, 50).await;

        let first = db.purchases().purchase(ada, widget, 1).await.unwrap();
        let second = db.purchases().purchase(ada, gadget, 2).await.unwrap();
        db.purchases().purchase(grace, widget, 3).await.unwrap();

        let history = db.purchases().history(ada).await.unwrap();
        assert_eq!(history.len(), 2);
        // Newest purchase first; id breaks same-date ties.
        assert_eq!(history[0].purchase_id, second.purchase_id);
        assert_eq!(history[0].product_name, "Gadget");
        assert_eq!(history[1].purchase_id, first.purchase_id);
        assert_eq!(history[1].product_name, "Widget");
    }

    #[tokio::test]
    async fn test_ledger_totals_and_order() {
        let db = test_db().await;
        let ada = seed_customer(&db, "Ada", "Lovelace").await;
        let grace = seed_customer(&db, "Grace", "Hopper").await;
        let widget = seed_product(&db, "Widget", 999, 50).await;

        let first = db.purchases().purchase(ada, widget, 3).await.unwrap();
        let second = db.purchases().purchase(grace, widget, 1).await.unwrap();

        let ledger = db.purchases().ledger().await.unwrap();
        assert_eq!(ledger.len(), 2);

        // Purchase id ascending.
        assert_eq!(ledger[0].purchase_id, first.purchase_id);
        assert_eq!(ledger[0].customer_name, "Ada Lovelace");
        assert_eq!(ledger[0].total_cents, 2997);
        assert_eq!(ledger[1].purchase_id, second.purchase_id);
        assert_eq!(ledger[1].customer_name, "Grace Hopper");
        assert_eq!(ledger[1].total_cents, 999);
    }

    /// Concurrent purchasers of one product must serialize on the write lock:
    /// exactly the subset that fits commits, and stock never goes negative.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_purchases_never_oversell() {
        let (db, path) = test_db_on_disk("oversell").await;
        let customer = seed_customer(&db, "Ada", "Lovelace").await;
        let product = seed_product(&db, "Widget", 999, 5).await;

        // Four buyers want 2 each; stock 5 only covers two of them.
        let mut handles = Vec::new();
        for _ in 0..4 {
            let repo = db.purchases();
            handles.push(tokio::spawn(
                async move { repo.purchase(customer, product, 2).await },
            ));
        }

        let mut committed = 0;
        let mut rejected = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(receipt) => {
                    assert_eq!(receipt.quantity, 2);
                    committed += 1;
                }
                Err(PurchaseError::InsufficientStock { .. }) => rejected += 1,
                Err(other) => panic!("unexpected purchase failure: {other}"),
            }
        }

        assert_eq!(committed, 2);
        assert_eq!(rejected, 2);
        assert_eq!(stock_of(&db, product).await, 1);
        assert_eq!(db.purchases().ledger().await.unwrap().len(), 2);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }
}
