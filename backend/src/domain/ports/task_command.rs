//! Driving port for task mutations reached through the ownership gate.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, TaskRequest, UserId};

/// Domain use-case port for creating and deleting tasks.
///
/// Callers have already confirmed ownership of every referenced resource.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskCommand: Send + Sync {
    /// Create a task for `owner`.
    async fn create_task(&self, owner: UserId, task: TaskRequest) -> Result<(), Error>;

    /// Delete the task identified by `task_id`.
    async fn delete_task(&self, owner: UserId, task_id: Uuid) -> Result<(), Error>;
}

/// Fixture command accepting every request without side effects.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTaskCommand;

#[async_trait]
impl TaskCommand for FixtureTaskCommand {
    async fn create_task(&self, _owner: UserId, _task: TaskRequest) -> Result<(), Error> {
        Ok(())
    }

    async fn delete_task(&self, _owner: UserId, _task_id: Uuid) -> Result<(), Error> {
        Ok(())
    }
}
