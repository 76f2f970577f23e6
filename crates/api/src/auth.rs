// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use parking_domain::{Admin, Resident, is_resident_id};
use parking_persistence::Persistence;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, AuthError};
use crate::request_response::User;

/// Caller roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrators manage residents, cars and every permit, and may
    /// issue exception permits.
    Admin,
    /// Residents request permits for their own guests and manage their
    /// own cars and visitors.
    Resident,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Resident => "resident",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated caller with an associated role.
///
/// Built from a verified access token; never from request bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The account ID of the caller.
    pub id: String,
    /// The role the caller logged in with.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The account ID
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The resident ID that list queries must be scoped to, if any.
    ///
    /// Administrators see everything; residents only their own rows.
    #[must_use]
    pub fn resident_scope(&self) -> Option<String> {
        match self.role {
            Role::Admin => None,
            Role::Resident => Some(self.id.clone()),
        }
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the actor is an administrator.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Resident => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: Role::Admin.to_string(),
            }),
        }
    }

    /// Checks that the actor is a resident.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is an administrator.
    pub fn authorize_resident(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Resident => Ok(()),
            Role::Admin => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: Role::Resident.to_string(),
            }),
        }
    }

    /// Checks that the actor may act on rows owned by `resident_id`.
    ///
    /// Administrators may act on any resident; a resident only on themself.
    ///
    /// # Errors
    ///
    /// Returns an error if a resident reaches for another resident's data.
    pub fn authorize_owner(
        actor: &AuthenticatedActor,
        resident_id: &str,
        action: &str,
    ) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Resident if actor.id == resident_id => Ok(()),
            Role::Resident => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("owner or admin"),
            }),
        }
    }
}

/// An account that can log in: either an administrator or a resident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Account {
    Admin(Admin),
    Resident(Resident),
}

impl Account {
    /// Looks up an account, dispatching on the shape of `id`.
    ///
    /// Resident-shaped IDs are only looked up among residents; anything else
    /// is matched case-insensitively against administrators.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find(persistence: &mut Persistence, id: &str) -> Result<Option<Self>, ApiError> {
        if is_resident_id(id) {
            Ok(persistence.get_resident(id)?.map(Self::Resident))
        } else {
            Ok(persistence.get_admin(id)?.map(Self::Admin))
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Admin(admin) => &admin.id,
            Self::Resident(resident) => &resident.id,
        }
    }

    #[must_use]
    pub fn password_hash(&self) -> &str {
        match self {
            Self::Admin(admin) => &admin.password,
            Self::Resident(resident) => &resident.password,
        }
    }

    #[must_use]
    pub const fn token_version(&self) -> i32 {
        match self {
            Self::Admin(admin) => admin.token_version,
            Self::Resident(resident) => resident.token_version,
        }
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Admin(_) => Role::Admin,
            Self::Resident(_) => Role::Resident,
        }
    }

    /// The public view of this account, without any secret.
    #[must_use]
    pub fn to_user(&self) -> User {
        match self {
            Self::Admin(admin) => User {
                id: admin.id.clone(),
                first_name: admin.first_name.clone(),
                last_name: admin.last_name.clone(),
                email: admin.email.clone(),
                role: Role::Admin,
            },
            Self::Resident(resident) => User {
                id: resident.id.clone(),
                first_name: resident.first_name.clone(),
                last_name: resident.last_name.clone(),
                email: resident.email.clone(),
                role: Role::Resident,
            },
        }
    }
}

/// Hashes a plain-text password with bcrypt.
///
/// This is CPU bound; callers must not hold a transaction open around it.
///
/// # Errors
///
/// Returns an internal error if hashing fails.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::internal("Failed to hash password", e))
}

/// Verifies a plain-text password against a stored bcrypt hash.
///
/// A malformed stored hash counts as a mismatch.
#[must_use]
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    bcrypt::verify(password, password_hash).unwrap_or(false)
}
