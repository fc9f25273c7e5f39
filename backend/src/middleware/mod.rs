//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! tracing. Ownership checks live with the HTTP adapter in
//! [`crate::inbound::http::ownership`].

pub mod trace;

pub use trace::Trace;
