//! Driving port for category mutations.
//!
//! Category persistence is not wired yet; handlers delegate here so the HTTP
//! contract stays stable once it is.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, NewCategory};

/// Domain use-case port for creating and deleting categories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryCommand: Send + Sync {
    /// Create a category.
    async fn create_category(&self, category: NewCategory) -> Result<(), Error>;

    /// Delete the category identified by `category_id`.
    async fn delete_category(&self, category_id: Uuid) -> Result<(), Error>;
}

/// Fixture command accepting every request without side effects.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCategoryCommand;

#[async_trait]
impl CategoryCommand for FixtureCategoryCommand {
    async fn create_category(&self, _category: NewCategory) -> Result<(), Error> {
        Ok(())
    }

    async fn delete_category(&self, _category_id: Uuid) -> Result<(), Error> {
        Ok(())
    }
}
