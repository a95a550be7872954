//! # shopfloor-core: Pure Domain Logic for Shopfloor
//!
//! Domain types and business rules for a small storefront: a product catalog,
//! a customer roster, and an immutable purchase ledger.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Shopfloor Architecture                          │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                  CLI Shell (apps/cli)                         │  │
//! │  │     role menus ──► prompts ──► table rendering                │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │             ★ shopfloor-core (THIS CRATE) ★                   │  │
//! │  │                                                               │  │
//! │  │   ┌───────────┐   ┌───────────┐   ┌────────────┐              │  │
//! │  │   │   types   │   │   money   │   │ validation │              │  │
//! │  │   │  Product  │   │   Money   │   │   rules    │              │  │
//! │  │   │  Receipt  │   │  (cents)  │   │   checks   │              │  │
//! │  │   └───────────┘   └───────────┘   └────────────┘              │  │
//! │  │                                                               │  │
//! │  │   NO I/O • NO DATABASE • PURE FUNCTIONS                       │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │              shopfloor-db (Database Layer)                    │  │
//! │  │        SQLite queries, migrations, purchase transaction       │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Purchase, Receipt, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Validation error types
//! - [`validation`] - Business rule validation

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use error::ValidationError;
pub use money::Money;
pub use types::*;

/// Maximum quantity a single purchase line may carry.
///
/// Prevents accidental over-ordering (e.g. typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
