//! Shared validation helpers for inbound HTTP adapters.

use actix_web::HttpRequest;
use actix_web::error::{JsonPayloadError, PathError};
use pagination::PageRequestError;
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorCode {
    MissingField,
    InvalidUuid,
    OutOfRange,
    InvalidJson,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::InvalidJson => "invalid_json",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) fn missing_field_error(field: FieldName, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": ErrorCode::MissingField.as_str(),
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, message: impl Into<String>, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": ErrorCode::InvalidUuid.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    let name = field.as_str();
    Uuid::parse_str(value)
        .map_err(|_| invalid_uuid_error(field, format!("{name} must be a valid UUID"), value))
}

pub(crate) fn page_request_error(err: PageRequestError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field(),
        "value": err.value(),
        "code": ErrorCode::OutOfRange.as_str(),
    }))
}

/// Decoder failure from a buffered body, reported with the decoder's message.
pub(crate) fn invalid_json_error(err: &serde_json::Error) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "code": ErrorCode::InvalidJson.as_str() }))
}

/// `web::JsonConfig` error handler producing the standard envelope.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let error = match &err {
        JsonPayloadError::Deserialize(inner) => invalid_json_error(inner),
        other => Error::invalid_request(other.to_string())
            .with_details(json!({ "code": ErrorCode::InvalidJson.as_str() })),
    };
    error.into()
}

/// `web::PathConfig` error handler producing the standard envelope.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(err.to_string()).into()
}
