//! Task API handlers behind the ownership gate.
//!
//! ```text
//! POST   /api/v1/task       {"title":"t","description":"d","category_ids":["…"]}
//! DELETE /api/v1/task/{id}
//! ```
//!
//! Both resources are wrapped by [`OwnershipGate`]; by the time a handler
//! runs the caller owns every referenced resource.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::domain::TaskRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::CurrentUser;
use crate::inbound::http::ownership::OwnershipGate;
use crate::inbound::http::schemas::{ErrorSchema, TaskRequestSchema};
use crate::inbound::http::state::HttpState;

/// Register the gated task resources on `cfg`.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use actix_web::{App, web};
/// use todolist::domain::ports::FixtureOwnershipChecker;
/// use todolist::inbound::http::ownership::OwnershipGate;
/// use todolist::inbound::http::tasks;
///
/// let gate = OwnershipGate::new(Arc::new(FixtureOwnershipChecker), Duration::from_secs(3));
/// let app = App::new().service(web::scope("/api/v1").configure(|cfg| tasks::configure(cfg, &gate)));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig, gate: &OwnershipGate) {
    cfg.service(
        web::resource("/task")
            .wrap(gate.categories())
            .route(web::post().to(create_task)),
    )
    .service(
        web::resource("/task/{id}")
            .wrap(gate.task())
            .route(web::delete().to(delete_task)),
    );
}

/// Create a task filed under categories the caller owns.
#[utoipa::path(
    post,
    path = "/api/v1/task",
    request_body = TaskRequestSchema,
    responses(
        (status = 200, description = "Task created"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "createTask"
)]
pub async fn create_task(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<TaskRequest>,
) -> ApiResult<HttpResponse> {
    state.tasks.create_task(user.0, payload.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Delete a task the caller owns.
#[utoipa::path(
    delete,
    path = "/api/v1/task/{id}",
    params(("id" = Uuid, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "deleteTask"
)]
pub async fn delete_task(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state.tasks.delete_task(user.0, path.into_inner()).await?;
    Ok(HttpResponse::Ok().finish())
}
