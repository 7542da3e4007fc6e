//! Catalog service.

use tracing::info;

use rental_core::validation::validate_new_catalog_item;
use rental_core::{require_role, CatalogItem, Identity, NewCatalogItem, Role};
use rental_db::{Database, DbError};

use crate::error::{ApiError, ApiResult};

/// Catalog service implementation.
#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(db: Database) -> Self {
        CatalogService { db }
    }

    /// Every vehicle, ordered by key.
    pub async fn list(&self) -> ApiResult<Vec<CatalogItem>> {
        Ok(self.db.catalog().list().await?)
    }

    pub async fn get(&self, key: &str) -> ApiResult<CatalogItem> {
        self.db
            .catalog()
            .get_by_key(key)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("Product with key {} not found", key)))
    }

    /// Adds a vehicle. Admin only.
    pub async fn create(
        &self,
        identity: Option<&Identity>,
        item: &NewCatalogItem,
    ) -> ApiResult<CatalogItem> {
        require_role(identity, &[Role::Admin])?;
        validate_new_catalog_item(item)?;

        let created = self.db.catalog().insert(item).await.map_err(|e| match e {
            DbError::UniqueViolation { .. } => {
                ApiError::bad_request(format!("Product with key {} already exists", item.key))
            }
            other => other.into(),
        })?;

        info!(key = %created.key, daily_rate = %created.daily_rate, "Vehicle added");
        Ok(created)
    }
}
