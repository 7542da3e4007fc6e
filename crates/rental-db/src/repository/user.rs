//! # User Repository
//!
//! Database operations for accounts. Emails are stored trimmed and
//! lowercased; callers normalize before lookup.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use rental_core::User;

const USER_COLUMNS: &str = r#"
    email, first_name, last_name, password_hash, role, phone,
    profile_picture, is_blocked, created_at
"#;

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Gets a user by (normalized) email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Inserts a new user.
    ///
    /// ## Errors
    /// `DbError::UniqueViolation { field: "email", .. }` if the email is taken.
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        debug!(email = %user.email, role = %user.role, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (
                email, first_name, last_name, password_hash, role, phone,
                profile_picture, is_blocked, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.phone)
        .bind(&user.profile_picture)
        .bind(user.is_blocked)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            err if err.is_unique_violation_on("users.email") => {
                DbError::duplicate("email", &user.email)
            }
            other => other,
        })?;

        Ok(())
    }

    /// Blocks or unblocks an account.
    pub async fn set_blocked(&self, email: &str, blocked: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE users SET is_blocked = ?2 WHERE email = ?1")
            .bind(email)
            .bind(blocked)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", email));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
