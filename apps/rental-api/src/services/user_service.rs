//! User service: registration, login and the startup admin account.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use rental_core::validation::{normalize_email, validate_password, validate_text};
use rental_core::{CoreError, Role, User};
use rental_db::{Database, DbError};

use crate::auth::{hash_password, verify_password, JwtManager};
use crate::error::{ApiError, ApiResult};

/// Body of `POST /api/users`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// Body of `POST /api/users/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// A successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub user: User,
}

/// User service implementation.
#[derive(Debug, Clone)]
pub struct UserService {
    db: Database,
}

impl UserService {
    /// Create a new user service.
    pub fn new(db: Database) -> Self {
        UserService { db }
    }

    /// Registers a customer account.
    ///
    /// The public endpoint never grants `admin`.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<User> {
        self.create_user(request, Role::Customer).await
    }

    /// Checks credentials and issues an identity token.
    pub async fn login(&self, jwt: &JwtManager, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let email = normalize_email(&request.email)?;

        let user = self
            .db
            .users()
            .get_by_email(&email)
            .await?
            .ok_or_else(|| CoreError::UserNotFound(email.clone()))?;

        if user.is_blocked {
            warn!(email = %email, "Blocked user attempted login");
            return Err(ApiError::forbidden(
                "User account is blocked. Please contact the admin",
            ));
        }

        if !verify_password(&request.password, &user.password_hash) {
            warn!(email = %email, "Login failed");
            return Err(ApiError::unauthorized("Login failed"));
        }

        let token = jwt.issue_token(&user)?;
        info!(email = %email, role = %user.role, "User logged in");

        Ok(LoginResponse {
            message: "Login Successful",
            token,
            user,
        })
    }

    /// Creates the configured admin account unless the email is taken.
    ///
    /// Returns whether an account was created.
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> ApiResult<bool> {
        let email = normalize_email(email)?;
        if self.db.users().get_by_email(&email).await?.is_some() {
            return Ok(false);
        }

        let request = RegisterRequest {
            email,
            first_name: "System".to_string(),
            last_name: "Admin".to_string(),
            password: password.to_string(),
            phone: None,
            profile_picture: None,
        };
        self.create_user(&request, Role::Admin).await?;
        Ok(true)
    }

    async fn create_user(&self, request: &RegisterRequest, role: Role) -> ApiResult<User> {
        let email = normalize_email(&request.email)?;
        validate_text("firstName", &request.first_name, 50)?;
        validate_text("lastName", &request.last_name, 50)?;
        validate_password(&request.password)?;
        if let Some(phone) = &request.phone {
            validate_text("phone", phone, 20)?;
        }

        let user = User {
            email,
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            password_hash: hash_password(&request.password)?,
            role,
            phone: request.phone.clone(),
            profile_picture: request.profile_picture.clone(),
            is_blocked: false,
            created_at: Utc::now(),
        };

        self.db.users().insert(&user).await.map_err(|e| match e {
            DbError::UniqueViolation { .. } => {
                ApiError::bad_request("A user with this email already exists")
            }
            other => other.into(),
        })?;

        info!(email = %user.email, role = %role, "User registered");
        Ok(user)
    }
}
