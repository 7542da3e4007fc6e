//! # Review Repository
//!
//! Database operations for reviews. A review is keyed by its author's email,
//! so each user has at most one.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use rental_core::Review;

const REVIEW_COLUMNS: &str =
    "email, name, rating, comment, profile_picture, is_approved, created_at";

/// Repository for review database operations.
#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    /// Creates a new ReviewRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReviewRepository { pool }
    }

    /// Inserts a new review.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation { field: "email", .. }` if this user already
    /// has a review.
    pub async fn insert(&self, review: &Review) -> DbResult<()> {
        debug!(email = %review.email, rating = review.rating, "Inserting review");

        sqlx::query(
            r#"
            INSERT INTO reviews (
                email, name, rating, comment, profile_picture, is_approved, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&review.email)
        .bind(&review.name)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(&review.profile_picture)
        .bind(review.is_approved)
        .bind(review.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            err if err.is_unique_violation_on("reviews.email") => {
                DbError::duplicate("email", &review.email)
            }
            other => other,
        })?;

        Ok(())
    }

    /// Gets the review written by `email`.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<Review>> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE email = ?1");
        let review = sqlx::query_as::<_, Review>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(review)
    }

    /// Lists reviews, newest first. `approved_only` hides pending ones.
    pub async fn list(&self, approved_only: bool) -> DbResult<Vec<Review>> {
        let filter = if approved_only {
            "WHERE is_approved = 1"
        } else {
            ""
        };
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews {filter} ORDER BY created_at DESC, rowid DESC"
        );

        let reviews = sqlx::query_as::<_, Review>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(reviews)
    }

    /// Marks a review as approved and returns it.
    pub async fn approve(&self, email: &str) -> DbResult<Review> {
        let result = sqlx::query("UPDATE reviews SET is_approved = 1 WHERE email = ?1")
            .bind(email)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Review", email));
        }

        self.get_by_email(email)
            .await?
            .ok_or_else(|| DbError::not_found("Review", email))
    }

    /// Deletes the review written by `email`.
    pub async fn delete(&self, email: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE email = ?1")
            .bind(email)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Review", email));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Utc;

    fn review(email: &str) -> Review {
        Review {
            email: email.to_string(),
            name: "Ann Perera".to_string(),
            rating: 5,
            comment: "Spotless car, easy pickup.".to_string(),
            profile_picture: None,
            is_approved: false,
            created_at: Utc::now(),
        }
    }

    async fn repo() -> ReviewRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().reviews()
    }

    #[tokio::test]
    async fn test_one_review_per_email() {
        let repo = repo().await;
        repo.insert(&review("ann@example.lk")).await.unwrap();

        let err = repo.insert(&review("ann@example.lk")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "email"));
    }

    #[tokio::test]
    async fn test_approve_and_filtered_list() {
        let repo = repo().await;
        repo.insert(&review("ann@example.lk")).await.unwrap();
        repo.insert(&review("ben@example.lk")).await.unwrap();

        assert!(repo.list(true).await.unwrap().is_empty());
        assert_eq!(repo.list(false).await.unwrap().len(), 2);

        let approved = repo.approve("ben@example.lk").await.unwrap();
        assert!(approved.is_approved);

        let visible = repo.list(true).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].email, "ben@example.lk");

        assert!(matches!(
            repo.approve("ghost@example.lk").await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = repo().await;
        repo.insert(&review("ann@example.lk")).await.unwrap();

        repo.delete("ann@example.lk").await.unwrap();
        assert!(repo.get_by_email("ann@example.lk").await.unwrap().is_none());
        assert!(matches!(
            repo.delete("ann@example.lk").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
