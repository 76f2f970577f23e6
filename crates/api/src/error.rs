// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use parking_domain::DomainError;
use parking_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// `Display` is meant for logs. What a client is shown comes from
/// [`ApiError::client_message`], which never includes internal detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A permit policy rule rejected the request.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A uniqueness rule was violated.
    AlreadyExists {
        /// What already exists.
        resource: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// The text a client sees for this error.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::AuthenticationFailed { .. } | Self::Unauthorized { .. } => {
                DomainError::Unauthorized.to_string()
            }
            Self::DomainRuleViolation { message, .. }
            | Self::InvalidInput { message, .. }
            | Self::ResourceNotFound { message, .. }
            | Self::AlreadyExists { message, .. } => message.clone(),
            Self::Internal { .. } => String::from("Internal server error"),
        }
    }

    pub(crate) fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: format!("{context}: {err}"),
        }
    }

    pub(crate) fn not_found(resource_type: &str) -> Self {
        translate_domain_error(DomainError::NotFound(resource_type.to_string()))
    }

    /// Maps a write that touched no row to a lookup miss on `resource_type`.
    pub(crate) fn from_missing(err: PersistenceError, resource_type: &str) -> Self {
        if err.is_not_found() {
            Self::not_found(resource_type)
        } else {
            err.into()
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::AlreadyExists { resource, message } => {
                write!(f, "{resource} conflict: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

/// Translates a domain error into an API error.
///
/// The domain message is kept verbatim; the variant decides the status
/// class the server will report.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::Malformed(payload) => ApiError::InvalidInput {
            field: payload,
            message,
        },
        DomainError::EmptyFields(fields) | DomainError::AllEditFieldsEmpty(fields) => {
            ApiError::InvalidInput {
                field: fields,
                message,
            }
        }
        DomainError::InvalidFields(_) => ApiError::InvalidInput {
            field: String::from("fields"),
            message,
        },
        DomainError::MissingIdField | DomainError::IdNotUuid => ApiError::InvalidInput {
            field: String::from("id"),
            message,
        },
        DomainError::InvalidResidentId => ApiError::InvalidInput {
            field: String::from("residentID"),
            message,
        },
        DomainError::NotFound(resource_type) => ApiError::ResourceNotFound {
            resource_type,
            message,
        },
        DomainError::AlreadyExists(resource) => ApiError::AlreadyExists { resource, message },
        DomainError::Unauthorized => ApiError::AuthenticationFailed { reason: message },
        DomainError::ResidentForPermitDne => ApiError::DomainRuleViolation {
            rule: String::from("resident_for_permit_exists"),
            message,
        },
        DomainError::CarForPermitDne => ApiError::DomainRuleViolation {
            rule: String::from("car_for_permit_exists"),
            message,
        },
        DomainError::CarActivePermit => ApiError::DomainRuleViolation {
            rule: String::from("car_single_active_permit"),
            message,
        },
        DomainError::PermitTooLong => ApiError::DomainRuleViolation {
            rule: String::from("max_permit_length"),
            message,
        },
        DomainError::ResidentTwoActivePermits => ApiError::DomainRuleViolation {
            rule: String::from("resident_two_active_permits"),
            message,
        },
        DomainError::EntityDaysTooLong { entity, .. } => ApiError::DomainRuleViolation {
            rule: format!("{entity}_days_exhausted"),
            message,
        },
        DomainError::PermitPlusEntityDaysTooLong { entity, .. } => {
            ApiError::DomainRuleViolation {
                rule: format!("{entity}_days_exceeded"),
                message,
            }
        }
    }
}
