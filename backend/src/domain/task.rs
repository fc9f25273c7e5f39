//! Task payloads inspected by the ownership gate.
//!
//! Fields missing from the JSON, or sent as `null`, fall back to empty values.
//! Unknown fields are ignored so clients may send a superset of this shape.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Decode `null` as the type's empty value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Descriptive part of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskBody {
    /// Short title.
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Free-form description.
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

/// Task create/update payload carrying the categories it is filed under.
///
/// Every element of `category_ids` must be a UUID; decoding fails otherwise,
/// so malformed identifiers never reach an ownership check.
///
/// # Examples
/// ```
/// use todolist::domain::TaskRequest;
///
/// let request: TaskRequest = serde_json::from_str(
///     r#"{"title":"t","description":"d","category_ids":["11111111-1111-1111-1111-111111111111"]}"#,
/// )
/// .expect("valid task payload");
/// assert_eq!(request.body.title, "t");
/// assert_eq!(request.category_ids.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    /// Title and description.
    #[serde(flatten)]
    pub body: TaskBody,
    /// Categories the task belongs to. A `null` element is still rejected.
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_ids: Vec<Uuid>,
}
