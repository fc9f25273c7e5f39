//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic and do not derive `ToSchema`. The
//! wrappers here mirror their serialised shape and are registered with
//! utoipa under the domain type's name.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request body exceeds the accepted size.
    #[schema(rename = "payload_too_large")]
    PayloadTooLarge,
    /// An unexpected error occurred on the server or a collaborator.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// Error envelope with machine-readable code and human-readable message.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "forbidden")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "unauthorized access to task")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::TaskRequest`].
///
/// Missing fields default to empty values; every category id must be a UUID.
#[derive(ToSchema)]
#[schema(as = crate::domain::TaskRequest)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct TaskRequestSchema {
    /// Short title.
    #[schema(example = "buy milk")]
    title: Option<String>,
    /// Free-form description.
    #[schema(example = "semi-skimmed")]
    description: Option<String>,
    /// Categories the task is filed under.
    category_ids: Option<Vec<uuid::Uuid>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn property_names(schema: RefOr<Schema>) -> Vec<String> {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_uses_camel_case_keys() {
        let names = property_names(ErrorSchema::schema());
        assert!(names.contains(&"traceId".to_owned()));
        assert!(!names.contains(&"trace_id".to_owned()));
    }

    #[test]
    fn task_request_schema_lists_category_ids() {
        let names = property_names(TaskRequestSchema::schema());
        assert!(names.contains(&"category_ids".to_owned()));
    }
}
