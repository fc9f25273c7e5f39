//! Domain primitives and ports.
//!
//! Purpose: Define strongly typed values for the ownership gate and the
//! category/task contracts. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport agnostic failure payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - UserId: authenticated user identity.
//! - Category, CategoryName: category listing values.
//! - TaskRequest: task payload inspected by the ownership gate.
//! - TraceId: request correlation identifier.

pub mod category;
pub mod error;
pub mod ports;
pub mod task;
pub mod trace_id;
pub mod user;

pub use self::category::{Category, CategoryName, NewCategory};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::task::{TaskBody, TaskRequest};
pub use self::trace_id::TraceId;
pub use self::user::{AuthenticatedUser, UserId, UserValidationError};

/// HTTP header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use todolist::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
