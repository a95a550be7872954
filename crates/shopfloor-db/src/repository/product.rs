//! # Product Repository
//!
//! Catalog listing and administration.
//!
//! Deletion policy: a product referenced by any purchase line must not be
//! deleted, or the ledger would point at nothing. That check is an explicit
//! query here, not a storage-engine constraint, so the refusal can be
//! reported as a normal outcome instead of a constraint error.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{AddProductError, DbResult, DeleteOutcome};
use shopfloor_core::{validation, NewProduct, Product};

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists all products, ordered by identifier ascending.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock_quantity
            FROM products
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - product found
    /// * `Ok(None)` - no such product
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, stock_quantity
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new catalog entry and returns its generated id.
    ///
    /// Validates name (non-empty), price (>= 0) and stock (>= 0) before
    /// touching storage.
    pub async fn insert(&self, product: &NewProduct) -> Result<i64, AddProductError> {
        validation::validate_new_product(product)?;

        debug!(name = %product.name, price_cents = product.price_cents, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, price_cents, stock_quantity)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(product.name.trim())
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .execute(&self.pool)
        .await
        .map_err(crate::error::DbError::from)?;

        Ok(result.last_insert_rowid())
    }

    /// Deletes a product unless the purchase ledger references it.
    ///
    /// The in-use check and the delete run in one immediate transaction so a
    /// concurrent purchase cannot slip a ledger reference in between them.
    pub async fn delete(&self, id: i64) -> DbResult<DeleteOutcome> {
        debug!(id, "Deleting product");

        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let referenced: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM purchase_items WHERE product_id = ?1 LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if referenced.is_some() {
            tx.rollback().await?;
            return Ok(DeleteOutcome::InUse);
        }

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        if result.rows_affected() == 0 {
            Ok(DeleteOutcome::NotFound)
        } else {
            Ok(DeleteOutcome::Deleted)
        }
    }

    /// Counts catalog entries (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seed_customer, seed_product, test_db};

    #[tokio::test]
    async fn test_insert_and_list_ordered_by_id() {
        let db = test_db().await;

        let first = seed_product(&db, "Widget", 999, 5).await;
        let second = seed_product(&db, "Gadget", 1250, 2).await;
        assert!(second > first);

        let products = db.products().list().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, first);
        assert_eq!(products[0].name, "Widget");
        assert_eq!(products[0].price_cents, 999);
        assert_eq!(products[0].stock_quantity, 5);
        assert_eq!(products[1].id, second);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_input() {
        let db = test_db().await;

        let bad_price = NewProduct {
            name: "Widget".to_string(),
            price_cents: -1,
            stock_quantity: 0,
        };
        assert!(matches!(
            db.products().insert(&bad_price).await,
            Err(AddProductError::Validation(_))
        ));

        let bad_name = NewProduct {
            name: "  ".to_string(),
            price_cents: 100,
            stock_quantity: 0,
        };
        assert!(matches!(
            db.products().insert(&bad_name).await,
            Err(AddProductError::Validation(_))
        ));

        // Nothing reached storage.
        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = test_db().await;
        let id = seed_product(&db, "Widget", 999, 5).await;

        let found = db.products().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.name, "Widget");

        assert!(db.products().get_by_id(id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unreferenced_product() {
        let db = test_db().await;
        let id = seed_product(&db, "Widget", 999, 5).await;

        let outcome = db.products().delete(id).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);

        // No longer listable.
        assert!(db.products().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let db = test_db().await;

        let outcome = db.products().delete(12345).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_delete_refused_when_ledger_references_product() {
        let db = test_db().await;
        let customer = seed_customer(&db, "Ada", "Lovelace").await;
        let product = seed_product(&db, "Widget", 999, 5).await;

        db.purchases().purchase(customer, product, 1).await.unwrap();

        let outcome = db.products().delete(product).await.unwrap();
        assert_eq!(outcome, DeleteOutcome::InUse);

        // Still listable.
        let products = db.products().list().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, product);
    }
}
