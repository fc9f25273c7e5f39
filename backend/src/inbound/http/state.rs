//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CategoryCommand, CategoryQuery, FixtureCategoryCommand, FixtureCategoryQuery,
    FixtureTaskCommand, TaskCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub categories: Arc<dyn CategoryCommand>,
    pub categories_query: Arc<dyn CategoryQuery>,
    pub tasks: Arc<dyn TaskCommand>,
}

impl HttpState {
    /// Construct state from explicit port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use todolist::domain::ports::{
    ///     FixtureCategoryCommand, FixtureCategoryQuery, FixtureTaskCommand,
    /// };
    /// use todolist::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(
    ///     Arc::new(FixtureCategoryCommand),
    ///     Arc::new(FixtureCategoryQuery),
    ///     Arc::new(FixtureTaskCommand),
    /// );
    /// let _tasks = state.tasks.clone();
    /// ```
    pub fn new(
        categories: Arc<dyn CategoryCommand>,
        categories_query: Arc<dyn CategoryQuery>,
        tasks: Arc<dyn TaskCommand>,
    ) -> Self {
        Self {
            categories,
            categories_query,
            tasks,
        }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(
            Arc::new(FixtureCategoryCommand),
            Arc::new(FixtureCategoryQuery),
            Arc::new(FixtureTaskCommand),
        )
    }
}
