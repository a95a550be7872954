//! # Domain Types
//!
//! Core domain types used throughout Shopfloor.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐       │
//! │  │    Product     │   │    Customer    │   │    Purchase    │       │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │       │
//! │  │  id (i64)      │   │  id (i64)      │   │  id (i64)      │       │
//! │  │  name          │   │  first_name    │   │  purchase_date │       │
//! │  │  price_cents   │   │  last_name     │   │  customer_id   │       │
//! │  │  stock_quantity│   │  email         │   │  staff_id?     │       │
//! │  └────────────────┘   └────────────────┘   └────────────────┘       │
//! │                                                                     │
//! │  Purchase ──1:N── PurchaseItem ──N:1── Product                      │
//! │  (the two together form the immutable purchase ledger)              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers are database-generated integers (`AUTOINCREMENT`); there is no
//! separate business key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog entry available for purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Database-generated identifier.
    pub id: i64,

    /// Display name shown in catalog listings and on receipts.
    pub name: String,

    /// Current catalog price in cents. Never negative.
    pub price_cents: i64,

    /// Units on hand. Never negative; the purchase transaction is the only
    /// writer that decrements it.
    pub stock_quantity: i64,
}

impl Product {
    /// Returns the catalog price as a Money value.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether the requested quantity is coverable by current stock.
    pub fn can_cover(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

/// Fields for a product about to be inserted (no identifier yet).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub stock_quantity: i64,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer on record.
///
/// Read-mostly: customers are created outside this system (no registration
/// flow), looked up by id to establish a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Customer {
    /// "First Last", as shown in the session banner and the ledger report.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Purchase Ledger
// =============================================================================

/// One checkout event. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Purchase {
    pub id: i64,
    pub purchase_date: DateTime<Utc>,
    pub customer_id: i64,
    /// Reserved for staff-attributed purchases; always `None` today.
    pub staff_id: Option<i64>,
}

/// A line item of a purchase. Immutable once created.
///
/// ## Snapshot Pattern
/// `price_at_purchase_cents` is copied from the product's price at the moment
/// of the locked read inside the purchase transaction. Later catalog price
/// changes never alter it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseItem {
    pub purchase_id: i64,
    pub product_id: i64,
    pub price_at_purchase_cents: i64,
    pub quantity: i64,
}

impl PurchaseItem {
    /// Returns the snapshotted unit price as Money.
    #[inline]
    pub fn price_at_purchase(&self) -> Money {
        Money::from_cents(self.price_at_purchase_cents)
    }

    /// Line total (`quantity * price_at_purchase`).
    #[inline]
    pub fn total(&self) -> Money {
        self.price_at_purchase().multiply_quantity(self.quantity)
    }
}

/// Returned by a successful purchase transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Identifier generated for the new purchase row.
    pub purchase_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Unit price locked in at transaction time.
    pub price_at_purchase_cents: i64,
}

impl Receipt {
    #[inline]
    pub fn price_at_purchase(&self) -> Money {
        Money::from_cents(self.price_at_purchase_cents)
    }

    /// Amount charged for the whole receipt.
    #[inline]
    pub fn total(&self) -> Money {
        self.price_at_purchase().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Query Projections
// =============================================================================

/// One row of a customer's purchase history (purchases joined with line items
/// and product names).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct HistoryEntry {
    pub purchase_id: i64,
    pub purchase_date: DateTime<Utc>,
    pub product_name: String,
    pub quantity: i64,
    pub price_at_purchase_cents: i64,
}

impl HistoryEntry {
    #[inline]
    pub fn price_at_purchase(&self) -> Money {
        Money::from_cents(self.price_at_purchase_cents)
    }
}

/// One row of the all-purchases report across every customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LedgerEntry {
    pub purchase_id: i64,
    pub purchase_date: DateTime<Utc>,
    pub customer_name: String,
    pub product_name: String,
    pub quantity: i64,
    pub price_at_purchase_cents: i64,
    /// `quantity * price_at_purchase_cents`, computed by the query.
    pub total_cents: i64,
}

impl LedgerEntry {
    #[inline]
    pub fn price_at_purchase(&self) -> Money {
        Money::from_cents(self.price_at_purchase_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_full_name() {
        let customer = Customer {
            id: 42,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        };
        assert_eq!(customer.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_product_can_cover() {
        let product = Product {
            id: 1,
            name: "Widget".to_string(),
            price_cents: 999,
            stock_quantity: 5,
        };
        assert!(product.can_cover(5));
        assert!(!product.can_cover(6));
    }

    #[test]
    fn test_receipt_total() {
        let receipt = Receipt {
            purchase_id: 7,
            product_id: 1,
            quantity: 3,
            price_at_purchase_cents: 999,
        };
        assert_eq!(receipt.total().cents(), 2997);
        assert_eq!(receipt.price_at_purchase(), Money::from_cents(999));
    }

    #[test]
    fn test_purchase_item_total() {
        let item = PurchaseItem {
            purchase_id: 7,
            product_id: 1,
            price_at_purchase_cents: 250,
            quantity: 4,
        };
        assert_eq!(item.total().cents(), 1000);
    }
}
