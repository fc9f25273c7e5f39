//! Ownership gate for task and category routes.
//!
//! Two middlewares share one bounded ownership checker:
//!
//! - [`CategoryOwnership`] buffers the body, decodes it as a [`TaskRequest`]
//!   and requires the caller to own every listed category.
//! - [`TaskOwnership`] reads the `{id}` path segment and requires the caller
//!   to own that task.
//!
//! Each stage is an exit point. A failing stage answers with exactly one
//! error envelope and the wrapped service is never called. Both middlewares
//! must wrap a resource (not an app or scope) so the path match is known when
//! they run.
//!
//! ```text
//! POST   /api/v1/task       {"title":"t","category_ids":["…"]}
//! DELETE /api/v1/task/{id}
//! ```

use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use actix_http::encoding::Decoder;
use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::HttpMessage;
use actix_web::error::PayloadError;
use actix_web::web::{Bytes, BytesMut};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use futures_util::{Stream, StreamExt};
use serde_json::json;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::domain::ports::{OwnershipCheckError, OwnershipChecker};
use crate::domain::{Error, TaskRequest, TraceId, UserId};
use crate::inbound::http::identity::authenticated_user;
use crate::inbound::http::validation::{
    FieldName, invalid_json_error, invalid_uuid_error, missing_field_error,
};

const TASK_ID_PARAM: &str = "id";

/// Largest task body the gate buffers unless configured otherwise. Matches
/// the default `web::JsonConfig` limit so the gate is never stricter than the
/// handler it guards.
pub const DEFAULT_BODY_LIMIT: usize = 2_097_152;

/// Factory for the two ownership middlewares.
///
/// Built once per process; every middleware it yields shares the checker,
/// the timeout and the body limit.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use actix_web::{App, HttpResponse, web};
/// use todolist::domain::ports::FixtureOwnershipChecker;
/// use todolist::inbound::http::ownership::OwnershipGate;
///
/// let gate = OwnershipGate::new(Arc::new(FixtureOwnershipChecker), Duration::from_secs(3));
/// let app = App::new().service(
///     web::resource("/task/{id}")
///         .wrap(gate.task())
///         .route(web::delete().to(HttpResponse::Ok)),
/// );
/// ```
#[derive(Clone)]
pub struct OwnershipGate {
    checker: BoundedChecker,
    body_limit: usize,
}

impl OwnershipGate {
    /// Create a gate asking `checker`, giving up after `timeout`.
    ///
    /// Task bodies are buffered up to [`DEFAULT_BODY_LIMIT`] bytes.
    pub fn new(checker: Arc<dyn OwnershipChecker>, timeout: Duration) -> Self {
        Self {
            checker: BoundedChecker { checker, timeout },
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Override the largest body, raw or decompressed, the category check
    /// buffers. Keep it equal to the route's `web::JsonConfig` limit.
    #[must_use]
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Middleware requiring ownership of every category in the body.
    pub fn categories(&self) -> CategoryOwnership {
        CategoryOwnership {
            checker: self.checker.clone(),
            body_limit: self.body_limit,
        }
    }

    /// Middleware requiring ownership of the task named by the `{id}` path
    /// segment.
    pub fn task(&self) -> TaskOwnership {
        TaskOwnership {
            checker: self.checker.clone(),
        }
    }
}

/// Ownership checker whose calls are cut off after a fixed duration.
///
/// The collaborator future and its timer live in one `Timeout` value; when
/// that value is dropped, on completion, expiry or client disconnect, the
/// pending query is dropped with it.
#[derive(Clone)]
struct BoundedChecker {
    checker: Arc<dyn OwnershipChecker>,
    timeout: Duration,
}

impl BoundedChecker {
    async fn categories(
        &self,
        user_id: UserId,
        category_ids: Vec<Uuid>,
    ) -> Result<bool, OwnershipCheckError> {
        self.bounded(self.checker.check_categories_ownership(user_id, category_ids))
            .await
    }

    async fn task(&self, user_id: UserId, task_id: Uuid) -> Result<bool, OwnershipCheckError> {
        self.bounded(self.checker.check_task_ownership(user_id, task_id))
            .await
    }

    async fn bounded<F>(&self, check: F) -> Result<bool, OwnershipCheckError>
    where
        F: Future<Output = Result<bool, OwnershipCheckError>>,
    {
        match tokio::time::timeout(self.timeout, check).await {
            Ok(answer) => answer,
            Err(_elapsed) => Err(OwnershipCheckError::timed_out(
                u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }
}

/// Map a collaborator answer onto the gate decision.
fn decide(
    answer: Result<bool, OwnershipCheckError>,
    user_id: UserId,
    denied: &'static str,
) -> Result<(), Error> {
    let trace_id = TraceId::current().map(|id| id.to_string());
    match answer {
        Ok(true) => Ok(()),
        Ok(false) => {
            warn!(
                trace_id = trace_id.as_deref(),
                user_id = %user_id,
                "{denied}"
            );
            Err(Error::forbidden(denied))
        }
        Err(failure) => {
            error!(
                trace_id = trace_id.as_deref(),
                user_id = %user_id,
                error = %failure,
                "ownership check failed"
            );
            Err(Error::internal(failure.to_string()))
        }
    }
}

/// Answer `req` with `error` without calling the wrapped service.
fn reject<B>(req: ServiceRequest, error: Error) -> ServiceResponse<EitherBody<B>> {
    req.error_response(error).map_into_right_body()
}

/// Fresh payload yielding `bytes` then end-of-stream.
fn replay_payload(bytes: Bytes) -> Payload {
    let (_, mut payload) = actix_http::h1::Payload::create(true);
    payload.unread_data(bytes);
    Payload::from(payload)
}

/// Why a body could not be buffered.
#[derive(Debug)]
enum BodyError {
    TooLarge,
    Unreadable(PayloadError),
}

impl BodyError {
    fn into_error(self, limit: usize) -> Error {
        match self {
            Self::TooLarge => Error::payload_too_large(format!(
                "request body exceeds {limit} bytes"
            ))
            .with_details(json!({ "limit": limit, "code": "body_too_large" })),
            Self::Unreadable(error) => {
                debug!(%error, "request body unreadable");
                Error::invalid_request("failed to read request body")
            }
        }
    }
}

/// Drain `stream` into one buffer of at most `limit` bytes.
async fn collect<S>(mut stream: S, limit: usize) -> Result<Bytes, BodyError>
where
    S: Stream<Item = Result<Bytes, PayloadError>> + Unpin,
{
    let mut buf = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(BodyError::Unreadable)?;
        if buf.len() + chunk.len() > limit {
            return Err(BodyError::TooLarge);
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

/// Inflate a copy of `raw` according to the request's `Content-Encoding`.
async fn inflate(req: &ServiceRequest, raw: &Bytes, limit: usize) -> Result<Bytes, BodyError> {
    let decoder = Decoder::from_headers(replay_payload(raw.clone()), req.headers());
    collect(Box::pin(decoder), limit).await
}

/// Middleware checking ownership of the categories named in a task body.
///
/// On success the wrapped service reads a body byte-identical to the one the
/// client sent. Compressed bodies are replayed still compressed; only a copy
/// is inflated for the ownership inspection.
#[derive(Clone)]
pub struct CategoryOwnership {
    checker: BoundedChecker,
    body_limit: usize,
}

impl<S, B> Transform<S, ServiceRequest> for CategoryOwnership
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = CategoryOwnershipMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CategoryOwnershipMiddleware {
            service: Rc::new(service),
            checker: self.checker.clone(),
            body_limit: self.body_limit,
        }))
    }
}

/// Service wrapper produced by [`CategoryOwnership`].
pub struct CategoryOwnershipMiddleware<S> {
    service: Rc<S>,
    checker: BoundedChecker,
    body_limit: usize,
}

impl<S, B> Service<ServiceRequest> for CategoryOwnershipMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let checker = self.checker.clone();
        let limit = self.body_limit;
        Box::pin(async move {
            let raw = match collect(req.take_payload(), limit).await {
                Ok(raw) => raw,
                Err(error) => return Ok(reject(req, error.into_error(limit))),
            };
            let Some(user_id) = authenticated_user(&req) else {
                return Ok(reject(req, Error::unauthorized("missing user id")));
            };
            let body = match inflate(&req, &raw, limit).await {
                Ok(body) => body,
                Err(error) => return Ok(reject(req, error.into_error(limit))),
            };
            let task: TaskRequest = match serde_json::from_slice(&body) {
                Ok(task) => task,
                Err(error) => return Ok(reject(req, invalid_json_error(&error))),
            };

            let answer = checker.categories(user_id, task.category_ids).await;
            if let Err(error) = decide(answer, user_id, "unauthorized access to categories") {
                return Ok(reject(req, error));
            }

            req.set_payload(replay_payload(raw));
            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Middleware checking ownership of the task named by the `{id}` segment.
///
/// The request passes through untouched on success.
#[derive(Clone)]
pub struct TaskOwnership {
    checker: BoundedChecker,
}

impl<S, B> Transform<S, ServiceRequest> for TaskOwnership
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = TaskOwnershipMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TaskOwnershipMiddleware {
            service: Rc::new(service),
            checker: self.checker.clone(),
        }))
    }
}

/// Service wrapper produced by [`TaskOwnership`].
pub struct TaskOwnershipMiddleware<S> {
    service: Rc<S>,
    checker: BoundedChecker,
}

fn task_id_from(req: &ServiceRequest) -> Result<Uuid, Error> {
    let field = FieldName::new(TASK_ID_PARAM);
    let raw = req.match_info().get(TASK_ID_PARAM).unwrap_or_default();
    if raw.is_empty() {
        return Err(missing_field_error(field, "task id required"));
    }
    Uuid::parse_str(raw).map_err(|_| invalid_uuid_error(field, "task id must be a valid UUID", raw))
}

impl<S, B> Service<ServiceRequest> for TaskOwnershipMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let checker = self.checker.clone();
        Box::pin(async move {
            let task_id = match task_id_from(&req) {
                Ok(task_id) => task_id,
                Err(error) => return Ok(reject(req, error)),
            };
            let Some(user_id) = authenticated_user(&req) else {
                return Ok(reject(req, Error::unauthorized("missing user id")));
            };

            let answer = checker.task(user_id, task_id).await;
            if let Err(error) = decide(answer, user_id, "unauthorized access to task") {
                return Ok(reject(req, error));
            }

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}
