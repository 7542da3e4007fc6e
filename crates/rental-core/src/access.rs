//! # Access Control
//!
//! The decoded identity of a request and the single capability check every
//! protected operation goes through.
//!
//! ```text
//!   Option<&Identity>          require_role(identity, &[Role::Admin])
//!   ─────────────────          ──────────────────────────────────────
//!   None                  ──►  CoreError::Unauthenticated   (401)
//!   Some(role ∉ allowed)  ──►  CoreError::Forbidden         (403)
//!   Some(role ∈ allowed)  ──►  Ok(&Identity)
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{Role, User};

/// Attributes of the caller, trusted for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub profile_picture: Option<String>,
    pub phone: Option<String>,
}

impl Identity {
    /// `first last`, used as the reviewer name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Identity {
            email: user.email.clone(),
            role: user.role,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_picture: user.profile_picture.clone(),
            phone: user.phone.clone(),
        }
    }
}

/// Requires any identity.
pub fn require_identity(identity: Option<&Identity>) -> CoreResult<&Identity> {
    identity.ok_or(CoreError::Unauthenticated)
}

/// Requires an identity whose role is one of `allowed`.
///
/// ## Example
/// ```rust
/// use rental_core::{require_role, CoreError, Role};
///
/// assert!(matches!(
///     require_role(None, &[Role::Admin]),
///     Err(CoreError::Unauthenticated)
/// ));
/// ```
pub fn require_role<'a>(
    identity: Option<&'a Identity>,
    allowed: &[Role],
) -> CoreResult<&'a Identity> {
    let identity = require_identity(identity)?;
    if allowed.contains(&identity.role) {
        Ok(identity)
    } else {
        Err(CoreError::Forbidden {
            required: allowed.to_vec(),
        })
    }
}
