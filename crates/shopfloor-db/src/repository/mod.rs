//! # Repository Module
//!
//! Database repository implementations for Shopfloor.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  CLI menu handler                                                   │
//! │       │                                                             │
//! │       │  db.purchases().purchase(customer_id, product_id, qty)      │
//! │       ▼                                                             │
//! │  PurchaseRepository                                                 │
//! │  ├── purchase(...)   ← the transactional core                       │
//! │  ├── history(customer_id)                                           │
//! │  └── ledger()                                                       │
//! │       │                                                             │
//! │       │  SQL                                                        │
//! │       ▼                                                             │
//! │  SQLite database                                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every SQL statement in the workspace lives under this module.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - catalog listing and administration
//! - [`customer::CustomerRepository`] - roster listing and session lookup
//! - [`purchase::PurchaseRepository`] - purchase transaction and ledger reports

pub mod customer;
pub mod product;
pub mod purchase;
