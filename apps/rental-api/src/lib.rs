//! # Rental API
//!
//! JSON HTTP server for the vehicle rental backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Rental API Services                             │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  OrderService  │  │  QuoteService  │  │  CatalogService            ││
//! │  │                │  │                │  │                            ││
//! │  │ • create_order │  │ • compute_quote│  │ • list / get               ││
//! │  │ • list_orders  │  │   (read only)  │  │ • create (admin)           ││
//! │  │ • update_status│  │                │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────┐            │
//! │  │  UserService   │  │ ReviewService  │  │ HealthService  │            │
//! │  │                │  │                │  │                │            │
//! │  │ • register     │  │ • create/list  │  │ • check        │            │
//! │  │ • login        │  │ • approve      │  │                │            │
//! │  │ • bootstrap    │  │ • delete       │  │                │            │
//! │  └────────────────┘  └────────────────┘  └────────────────┘            │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │  ┌──────────────┐  ┌──────────────────┐  ┌─────────────────────┐ │  │
//! │  │  │  SQLite      │  │  JWT identity    │  │  Error rendering    │ │  │
//! │  │  │  (rental-db) │  │  (MaybeIdentity) │  │  (ApiError)         │ │  │
//! │  │  └──────────────┘  └──────────────────┘  └─────────────────────┘ │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (see [`config::AppConfig`]):
//! - `PORT` - HTTP port (default: 3000)
//! - `DATABASE_PATH` - SQLite file (default: ./data/rental.db)
//! - `DB_MAX_CONNECTIONS`, `DB_BUSY_TIMEOUT_SECS` - pool settings
//! - `JWT_SECRET`, `JWT_LIFETIME_SECS` - identity tokens
//! - `APP_ENV` - `development` or `production`
//! - `ADMIN_EMAIL`, `ADMIN_PASSWORD` - admin account created at startup

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;

use std::sync::Arc;

use rental_db::Database;

// Re-exports
pub use auth::{JwtManager, MaybeIdentity};
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use routes::build_router;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs);
        AppState {
            db,
            jwt: Arc::new(jwt),
            config: Arc::new(config),
        }
    }
}
