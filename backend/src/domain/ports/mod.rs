//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod category_command;
mod category_query;
mod ownership_checker;
mod task_command;

#[cfg(test)]
pub use category_command::MockCategoryCommand;
pub use category_command::{CategoryCommand, FixtureCategoryCommand};
#[cfg(test)]
pub use category_query::MockCategoryQuery;
pub use category_query::{CategoryQuery, FixtureCategoryQuery};
#[cfg(test)]
pub use ownership_checker::MockOwnershipChecker;
pub use ownership_checker::{
    FIXTURE_OWNER_ID, FixtureOwnershipChecker, OwnershipCheckError, OwnershipChecker,
};
#[cfg(test)]
pub use task_command::MockTaskCommand;
pub use task_command::{FixtureTaskCommand, TaskCommand};
