//! Category values.
//!
//! Names are carried verbatim. The create contract only declares a `name`
//! string, so no content rules are applied here.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name of a category.
///
/// # Examples
/// ```
/// use todolist::domain::CategoryName;
///
/// let name = CategoryName::new(" Home chores ");
/// assert_eq!(name.as_ref(), " Home chores ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    /// Wrap `name` as given.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<String> for CategoryName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<CategoryName> for String {
    fn from(value: CategoryName) -> Self {
        value.0
    }
}

/// Category requested by a create call, before an identifier is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// Requested display name.
    pub name: CategoryName,
}

/// Stored category as returned by listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: Uuid,
    name: CategoryName,
}

impl Category {
    /// Build a category from its parts.
    pub fn new(id: Uuid, name: CategoryName) -> Self {
        Self { id, name }
    }

    /// Stable identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &CategoryName {
        &self.name
    }
}
