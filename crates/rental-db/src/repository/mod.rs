//! # Repository Module
//!
//! Database repository implementations for the rental backend.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP service                                                          │
//! │       │                                                                 │
//! │       │  db.orders().create(new_order)                                 │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── create(&self, order)          ← allocates ORDnnnn + inserts      │
//! │  ├── get_by_id(&self, order_id)                                        │
//! │  ├── list_by_email / list_all                                          │
//! │  └── update_status(&self, ...)     ← conditional on Pending            │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`catalog::CatalogRepository`] - Vehicle lookup, single and batch
//! - [`order::OrderRepository`] - Orders, line snapshots, the order sequence
//! - [`user::UserRepository`] - Accounts
//! - [`review::ReviewRepository`] - Reviews and moderation
//!
//! Row decoding goes through private `*Row` structs where a column needs
//! conversion (JSON image lists, line items stored in a child table).

pub mod catalog;
pub mod order;
pub mod review;
pub mod user;
