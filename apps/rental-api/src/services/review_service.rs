//! Review service.
//!
//! One review per email. New reviews are hidden until an admin approves
//! them.

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use rental_core::validation::{normalize_email, validate_rating, validate_text};
use rental_core::{require_identity, require_role, CoreError, Identity, Review, Role};
use rental_db::{Database, DbError};

use crate::error::{ApiError, ApiResult};

/// Body of `POST /api/reviews`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReviewRequest {
    #[serde(default)]
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}

/// Review service implementation.
#[derive(Debug, Clone)]
pub struct ReviewService {
    db: Database,
}

impl ReviewService {
    /// Create a new review service.
    pub fn new(db: Database) -> Self {
        ReviewService { db }
    }

    /// Adds the caller's review.
    pub async fn create(
        &self,
        identity: Option<&Identity>,
        request: &NewReviewRequest,
    ) -> ApiResult<Review> {
        let identity = require_identity(identity)?;
        validate_rating(request.rating)?;
        validate_text("comment", &request.comment, 500)?;

        let review = Review {
            email: identity.email.clone(),
            name: identity.full_name(),
            rating: request.rating,
            comment: request.comment.trim().to_string(),
            profile_picture: identity.profile_picture.clone(),
            is_approved: false,
            created_at: Utc::now(),
        };

        self.db.reviews().insert(&review).await.map_err(|e| match e {
            DbError::UniqueViolation { .. } => {
                ApiError::bad_request("You have already submitted a review")
            }
            other => other.into(),
        })?;

        info!(email = %review.email, rating = review.rating, "Review added");
        Ok(review)
    }

    /// Admins see every review; everyone else only approved ones.
    pub async fn list(&self, identity: Option<&Identity>) -> ApiResult<Vec<Review>> {
        let approved_only = !identity.is_some_and(Identity::is_admin);
        Ok(self.db.reviews().list(approved_only).await?)
    }

    pub async fn approve(&self, identity: Option<&Identity>, email: &str) -> ApiResult<Review> {
        require_role(identity, &[Role::Admin])?;
        let email = normalize_email(email)?;

        let review = self.db.reviews().approve(&email).await.map_err(not_found)?;
        info!(email = %email, "Review approved");
        Ok(review)
    }

    /// Admins may delete any review, customers only their own.
    pub async fn delete(&self, identity: Option<&Identity>, email: &str) -> ApiResult<()> {
        let identity = require_identity(identity)?;
        let email = normalize_email(email)?;
        if !identity.is_admin() && identity.email != email {
            return Err(CoreError::Forbidden {
                required: vec![Role::Admin],
            }
            .into());
        }

        self.db.reviews().delete(&email).await.map_err(not_found)?;
        info!(email = %email, by = %identity.email, "Review deleted");
        Ok(())
    }
}

fn not_found(err: DbError) -> ApiError {
    match err {
        DbError::NotFound { id, .. } => CoreError::ReviewNotFound(id).into(),
        other => other.into(),
    }
}
