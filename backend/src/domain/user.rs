//! User identity values.
//!
//! The authentication stage is external; this module only models the
//! identifier it hands over and the typed wrapper stored in request scope.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned when parsing a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier was empty.
    EmptyId,
    /// The identifier was not a canonical UUID.
    InvalidId,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// # Examples
/// ```
/// use todolist::domain::UserId;
///
/// let id = UserId::new("123e4567-e89b-12d3-a456-426614174000").expect("valid id");
/// assert_eq!(id.to_string(), "123e4567-e89b-12d3-a456-426614174000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an already parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identity placed into request scope by the authentication stage.
///
/// Stored in actix request extensions under its own type, so lookups are
/// typed rather than keyed by string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    /// Mark `user_id` as authenticated for the current request.
    pub fn new(user_id: UserId) -> Self {
        Self(user_id)
    }

    /// Identifier of the authenticated user.
    pub fn user_id(&self) -> UserId {
        self.0
    }
}
