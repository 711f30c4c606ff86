use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub owner_id: Option<String>,
    pub branch_id: Option<String>,
    pub aud: Option<String>,
    pub iat: Option<u64>,
}

/// The closed set of staff roles. Anything else in a token is rejected
/// during validation instead of being string-matched in handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Receptionist,
}

impl Role {
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "admin" => Some(Role::Admin),
            "receptionist" => Some(Role::Receptionist),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Receptionist => write!(f, "receptionist"),
        }
    }
}

/// Authenticated request context, built once by the auth middleware and
/// carried through request extensions. `owner_id` is the tenant key:
/// for admins it equals their own user id, for receptionists it points
/// at the owner whose branch they work in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub role: Role,
    pub owner_id: String,
    pub branch_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Authorization policy for branch-scoped resources.
    ///
    /// Admins may target any branch of their tenancy, or all branches when
    /// no filter is requested. Receptionists are pinned to the branch in
    /// their token; requesting any other branch is an authorization error.
    pub fn resolve_branch_scope(&self, requested: Option<&str>) -> Result<Option<String>, AppError> {
        match self.role {
            Role::Admin => Ok(requested.map(str::to_string)),
            Role::Receptionist => {
                let own = self.branch_id.as_deref().ok_or_else(|| {
                    AppError::Auth("Receptionist account has no branch assigned".to_string())
                })?;

                if let Some(asked) = requested {
                    if asked != own {
                        return Err(AppError::Auth(
                            "Not authorized to access this branch".to_string(),
                        ));
                    }
                }

                Ok(Some(own.to_string()))
            }
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        match self.role {
            Role::Admin => Ok(()),
            Role::Receptionist => Err(AppError::Auth("Admin access required".to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub valid: bool,
    pub user_id: String,
    pub email: Option<String>,
    pub role: Role,
    pub owner_id: String,
    pub branch_id: Option<String>,
}
