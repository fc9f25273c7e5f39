//! To-do list HTTP service: category endpoints and the ownership gate that
//! guards task and category access.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
