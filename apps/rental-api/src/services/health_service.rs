//! Health check service.
//!
//! Reports database reachability and migration state for monitoring.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use rental_db::migrations::migration_status;
use rental_db::Database;

/// Serving status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServingStatus {
    Serving,
    NotServing,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResponse {
    pub status: ServingStatus,
    pub message: String,
    pub migrations_total: usize,
    pub migrations_applied: usize,
    pub server_time: DateTime<Utc>,
}

/// Health service implementation.
#[derive(Debug, Clone)]
pub struct HealthService {
    db: Database,
}

impl HealthService {
    /// Create a new health service.
    pub fn new(db: Database) -> Self {
        HealthService { db }
    }

    /// Check overall system health.
    pub async fn check(&self) -> HealthCheckResponse {
        let (migrations_total, migrations_applied) =
            migration_status(self.db.pool()).await.unwrap_or((0, 0));

        let (status, message) = if !self.db.health_check().await {
            warn!("Health check: database unreachable");
            (ServingStatus::NotServing, "Database unreachable".to_string())
        } else if migrations_applied < migrations_total {
            (
                ServingStatus::NotServing,
                format!(
                    "{} of {} migrations applied",
                    migrations_applied, migrations_total
                ),
            )
        } else {
            (ServingStatus::Serving, "OK".to_string())
        };

        HealthCheckResponse {
            status,
            message,
            migrations_total,
            migrations_applied,
            server_time: Utc::now(),
        }
    }
}
