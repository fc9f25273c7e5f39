//! HTTP inbound adapter exposing the category and task endpoints.

pub mod categories;
pub mod error;
pub mod identity;
pub mod ownership;
pub mod schemas;
pub mod state;
pub mod tasks;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
