//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the category handlers, the gated task handlers and
//! the schema wrappers from [`crate::inbound::http::schemas`]. The document
//! is served by Swagger UI in debug builds and printed by
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::categories::{
    CategoriesResponse, CategoryBody, CategoryResponse, ListCategoriesBody,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, TaskRequestSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie carrying the caller's user id.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "To-do list API",
        description = "Category management and ownership-gated task endpoints."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::categories::create_category,
        crate::inbound::http::categories::delete_category,
        crate::inbound::http::categories::list_categories,
        crate::inbound::http::tasks::create_task,
        crate::inbound::http::tasks::delete_task,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        TaskRequestSchema,
        CategoryBody,
        ListCategoriesBody,
        CategoryResponse,
        CategoriesResponse
    )),
    tags(
        (name = "categories", description = "Category lifecycle and listing"),
        (name = "tasks", description = "Task operations guarded by ownership checks")
    )
)]
pub struct ApiDoc;
