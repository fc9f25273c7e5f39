//! Driving port for category listings.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Category, Error};

/// Domain use-case port for listing categories one page at a time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryQuery: Send + Sync {
    /// Return the categories on the requested page, in display order.
    async fn list_categories(&self, page: PageRequest) -> Result<Vec<Category>, Error>;
}

/// Fixture query returning no categories.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCategoryQuery;

#[async_trait]
impl CategoryQuery for FixtureCategoryQuery {
    async fn list_categories(&self, _page: PageRequest) -> Result<Vec<Category>, Error> {
        Ok(Vec::new())
    }
}
