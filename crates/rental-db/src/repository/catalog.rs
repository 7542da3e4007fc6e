//! # Catalog Repository
//!
//! Database operations for rentable vehicles.
//!
//! ## Key Operations
//! - Lookup by key, one at a time (order pipeline) or in a batch (quotes)
//! - Listing for the public catalog
//! - Admin insert
//!
//! Image lists are stored as a JSON array in a TEXT column and decoded on
//! read; a value that is not a JSON string array is reported as
//! [`DbError::Corrupt`].

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use rental_core::{CatalogItem, Money, NewCatalogItem};

const CATALOG_COLUMNS: &str = r#"
    key, model, make, year, description, images, daily_rate,
    is_available, rented, transmission, fuel_type, seats, car_type,
    location, created_at
"#;

/// Raw `catalog_items` row.
#[derive(Debug, FromRow)]
struct CatalogRow {
    key: String,
    model: String,
    make: String,
    year: i32,
    description: Option<String>,
    images: String,
    daily_rate: Money,
    is_available: bool,
    rented: bool,
    transmission: String,
    fuel_type: String,
    seats: i32,
    car_type: String,
    location: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CatalogRow> for CatalogItem {
    type Error = DbError;

    fn try_from(row: CatalogRow) -> DbResult<Self> {
        let images: Vec<String> = serde_json::from_str(&row.images)
            .map_err(|e| DbError::corrupt(format!("catalog item {}", row.key), e))?;

        Ok(CatalogItem {
            key: row.key,
            model: row.model,
            make: row.make,
            year: row.year,
            description: row.description,
            images,
            daily_rate: row.daily_rate,
            is_available: row.is_available,
            rented: row.rented,
            transmission: row.transmission,
            fuel_type: row.fuel_type,
            seats: row.seats,
            car_type: row.car_type,
            location: row.location,
            created_at: row.created_at,
        })
    }
}

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CatalogRepository::new(pool);
///
/// let vehicle = repo.get_by_key("TOY-AXIO-01").await?;
/// let batch = repo.get_many_by_keys(&["TOY-AXIO-01", "NIS-LEAF-02"]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Gets a vehicle by its key.
    pub async fn get_by_key(&self, key: &str) -> DbResult<Option<CatalogItem>> {
        debug!(key = %key, "Looking up catalog item");

        let sql = format!("SELECT {CATALOG_COLUMNS} FROM catalog_items WHERE key = ?1");
        let row = sqlx::query_as::<_, CatalogRow>(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        row.map(CatalogItem::try_from).transpose()
    }

    /// Gets every vehicle whose key is in `keys`.
    ///
    /// Unknown keys are simply absent from the result; duplicates in `keys`
    /// yield one item. Result order is by key.
    pub async fn get_many_by_keys<S: AsRef<str>>(&self, keys: &[S]) -> DbResult<Vec<CatalogItem>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        debug!(count = keys.len(), "Batch catalog lookup");

        let placeholders = (1..=keys.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {CATALOG_COLUMNS} FROM catalog_items WHERE key IN ({placeholders}) ORDER BY key"
        );

        let mut query = sqlx::query_as::<_, CatalogRow>(&sql);
        for key in keys {
            query = query.bind(key.as_ref());
        }

        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(CatalogItem::try_from)
            .collect()
    }

    /// Lists the whole catalog, ordered by key.
    pub async fn list(&self) -> DbResult<Vec<CatalogItem>> {
        let sql = format!("SELECT {CATALOG_COLUMNS} FROM catalog_items ORDER BY key");
        sqlx::query_as::<_, CatalogRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(CatalogItem::try_from)
            .collect()
    }

    /// Inserts a new vehicle. New vehicles are never rented.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if the key already exists.
    pub async fn insert(&self, item: &NewCatalogItem) -> DbResult<CatalogItem> {
        debug!(key = %item.key, "Inserting catalog item");

        let now = Utc::now();
        let images =
            serde_json::to_string(&item.images).map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO catalog_items (
                key, model, make, year, description, images, daily_rate,
                is_available, rented, transmission, fuel_type, seats, car_type,
                location, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(item.key.trim())
        .bind(&item.model)
        .bind(&item.make)
        .bind(item.year)
        .bind(&item.description)
        .bind(images)
        .bind(item.daily_rate)
        .bind(item.is_available)
        .bind(&item.transmission)
        .bind(&item.fuel_type)
        .bind(item.seats)
        .bind(&item.car_type)
        .bind(&item.location)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field == "catalog_items.key" => {
                DbError::duplicate("key", item.key.trim())
            }
            other => other,
        })?;

        self.get_by_key(item.key.trim())
            .await?
            .ok_or_else(|| DbError::not_found("CatalogItem", item.key.trim()))
    }

    /// Marks a vehicle as checked out or returned.
    pub async fn set_rented(&self, key: &str, rented: bool) -> DbResult<()> {
        debug!(key = %key, rented, "Updating rented flag");

        let result = sqlx::query("UPDATE catalog_items SET rented = ?2 WHERE key = ?1")
            .bind(key)
            .bind(rented)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("CatalogItem", key));
        }

        Ok(())
    }

    /// Counts catalog entries (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM catalog_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
