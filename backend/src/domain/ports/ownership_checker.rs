//! Driven port for the external ownership authority.
//!
//! The ownership relation (user × resource → owned) lives in another
//! service backed by its own store. The HTTP gate only asks questions through
//! this port and never caches the answers.

use async_trait::async_trait;
use uuid::Uuid;

use super::define_port_error;
use crate::domain::UserId;

define_port_error! {
    /// Failures raised while asking the ownership authority.
    pub enum OwnershipCheckError {
        /// The authority could not be reached.
        Connection { message: String } => "ownership service connection failed: {message}",
        /// The authority answered with an error.
        Query { message: String } => "ownership query failed: {message}",
        /// No answer arrived within the configured bound.
        TimedOut { timeout_ms: u64 } => "ownership check timed out after {timeout_ms}ms",
    }
}

/// Ownership queries consumed by the HTTP ownership gate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnershipChecker: Send + Sync {
    /// Return `true` only when `user_id` owns every category in `category_ids`.
    async fn check_categories_ownership(
        &self,
        user_id: UserId,
        category_ids: Vec<Uuid>,
    ) -> Result<bool, OwnershipCheckError>;

    /// Return `true` when `user_id` owns `task_id`.
    async fn check_task_ownership(
        &self,
        user_id: UserId,
        task_id: Uuid,
    ) -> Result<bool, OwnershipCheckError>;
}

/// Identifier of the user that owns every resource in fixture mode.
pub const FIXTURE_OWNER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Temporary authority used until the ownership service is wired.
///
/// The fixture owner owns everything; every other user owns nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOwnershipChecker;

impl FixtureOwnershipChecker {
    fn owns_everything(user_id: UserId) -> Result<bool, OwnershipCheckError> {
        let owner = UserId::new(FIXTURE_OWNER_ID)
            .map_err(|err| OwnershipCheckError::query(format!("invalid fixture owner id: {err}")))?;
        Ok(owner == user_id)
    }
}

#[async_trait]
impl OwnershipChecker for FixtureOwnershipChecker {
    async fn check_categories_ownership(
        &self,
        user_id: UserId,
        _category_ids: Vec<Uuid>,
    ) -> Result<bool, OwnershipCheckError> {
        Self::owns_everything(user_id)
    }

    async fn check_task_ownership(
        &self,
        user_id: UserId,
        _task_id: Uuid,
    ) -> Result<bool, OwnershipCheckError> {
        Self::owns_everything(user_id)
    }
}
