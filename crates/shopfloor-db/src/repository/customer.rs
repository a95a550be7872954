//! # Customer Repository
//!
//! Roster listing and session lookup. Read-mostly: the storefront has no
//! registration flow, so `insert` exists for seeding and administration
//! tooling only.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use shopfloor_core::Customer;

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists all customers, ordered by identifier ascending.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, first_name, last_name, email
            FROM customers
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Looks up a customer by id (the "login" of the CLI).
    ///
    /// ## Returns
    /// * `Ok(Some(Customer))` - customer on record
    /// * `Ok(None)` - unknown id; the caller reports and re-prompts
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, first_name, last_name, email
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a customer and returns the generated id.
    pub async fn insert(&self, first_name: &str, last_name: &str, email: &str) -> DbResult<i64> {
        debug!(first_name, last_name, "Inserting customer");

        let result = sqlx::query(
            r#"
            INSERT INTO customers (first_name, last_name, email)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Counts customers (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seed_customer, test_db};

    #[tokio::test]
    async fn test_list_ordered_by_id() {
        let db = test_db().await;

        let ada = seed_customer(&db, "Ada", "Lovelace").await;
        let grace = seed_customer(&db, "Grace", "Hopper").await;

        let customers = db.customers().list().await.unwrap();
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].id, ada);
        assert_eq!(customers[0].full_name(), "Ada Lovelace");
        assert_eq!(customers[1].id, grace);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let db = test_db().await;
        let ada = seed_customer(&db, "Ada", "Lovelace").await;

        let found = db.customers().get_by_id(ada).await.unwrap().unwrap();
        assert_eq!(found.email, "ada@example.com");

        assert!(db.customers().get_by_id(ada + 99).await.unwrap().is_none());
    }
}
