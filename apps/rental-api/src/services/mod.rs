//! Service implementations.
//!
//! Each service wraps the shared [`rental_db::Database`] handle and turns one
//! HTTP use case into core checks plus repository calls. Handlers in
//! `routes` stay thin: extract, call a service, wrap the result.

pub mod catalog_service;
pub mod health_service;
pub mod order_service;
pub mod quote_service;
pub mod review_service;
pub mod user_service;

pub use catalog_service::CatalogService;
pub use health_service::HealthService;
pub use order_service::OrderService;
pub use quote_service::QuoteService;
pub use review_service::ReviewService;
pub use user_service::UserService;
