//! Behaviour tests for the ownership gate mounted behind a real session.
//!
//! Each scenario signs in through a private session cookie, sends one gated
//! request and inspects what the caller and the downstream handler observed.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_session::config::CookieContentSecurity;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::{Cookie, Key};
use actix_web::web::Bytes;
use actix_web::test as actix_test;
use actix_web::{App, HttpResponse, web};
use async_trait::async_trait;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::Value;
use todolist::Trace;
use todolist::domain::ports::{OwnershipCheckError, OwnershipChecker};
use todolist::domain::{TRACE_ID_HEADER, UserId};
use todolist::inbound::http::identity::{self, SessionIdentity};
use todolist::inbound::http::ownership::OwnershipGate;
use uuid::Uuid;

const CHECK_TIMEOUT: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy)]
enum Answer {
    Grant,
    Deny,
    Stall,
}

struct StubChecker {
    answer: Answer,
    calls: Arc<AtomicUsize>,
}

impl StubChecker {
    async fn respond(&self) -> Result<bool, OwnershipCheckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.answer {
            Answer::Grant => Ok(true),
            Answer::Deny => Ok(false),
            Answer::Stall => std::future::pending().await,
        }
    }
}

#[async_trait]
impl OwnershipChecker for StubChecker {
    async fn check_categories_ownership(
        &self,
        _user_id: UserId,
        _category_ids: Vec<Uuid>,
    ) -> Result<bool, OwnershipCheckError> {
        self.respond().await
    }

    async fn check_task_ownership(
        &self,
        _user_id: UserId,
        _task_id: Uuid,
    ) -> Result<bool, OwnershipCheckError> {
        self.respond().await
    }
}

/// Bodies seen by the handlers behind the gate.
#[derive(Clone, Default)]
struct HandlerLog(Arc<Mutex<Vec<Bytes>>>);

impl HandlerLog {
    fn record(&self, body: Bytes) {
        self.0.lock().expect("handler log lock").push(body);
    }

    fn bodies(&self) -> Vec<Bytes> {
        self.0.lock().expect("handler log lock").clone()
    }
}

async fn login(session: Session) -> actix_web::Result<HttpResponse> {
    identity::persist_user(&session, &UserId::random())?;
    Ok(HttpResponse::Ok().finish())
}

async fn record_task(log: web::Data<HandlerLog>, body: Bytes) -> HttpResponse {
    log.record(body);
    HttpResponse::Ok().finish()
}

async fn record_delete(log: web::Data<HandlerLog>) -> HttpResponse {
    log.record(Bytes::new());
    HttpResponse::Ok().finish()
}

#[derive(Debug, Clone)]
enum Gated {
    CreateTask(Bytes),
    DeleteTask(String),
}

struct Outcome {
    status: u16,
    trace_id: Option<String>,
    body: Value,
}

struct OwnershipWorld {
    signed_in: Cell<bool>,
    answer: Cell<Answer>,
    request: RefCell<Option<Gated>>,
    outcome: RefCell<Option<Outcome>>,
    calls: Arc<AtomicUsize>,
    handled: HandlerLog,
}

impl OwnershipWorld {
    fn new() -> Self {
        Self {
            signed_in: Cell::new(false),
            answer: Cell::new(Answer::Grant),
            request: RefCell::new(None),
            outcome: RefCell::new(None),
            calls: Arc::new(AtomicUsize::new(0)),
            handled: HandlerLog::default(),
        }
    }

    fn send(&self, request: Gated) {
        *self.request.borrow_mut() = Some(request.clone());
        let checker = StubChecker {
            answer: self.answer.get(),
            calls: Arc::clone(&self.calls),
        };
        let outcome = actix_web::rt::System::new().block_on(run_request(
            checker,
            self.handled.clone(),
            self.signed_in.get(),
            request,
        ));
        *self.outcome.borrow_mut() = Some(outcome);
    }

    fn with_outcome<F>(&self, f: F)
    where
        F: FnOnce(&Outcome),
    {
        let outcome = self.outcome.borrow();
        f(outcome.as_ref().expect("a request should have been sent"));
    }
}

async fn run_request(
    checker: StubChecker,
    handled: HandlerLog,
    signed_in: bool,
    request: Gated,
) -> Outcome {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .cookie_content_security(CookieContentSecurity::Private)
        .build();
    let gate = OwnershipGate::new(Arc::new(checker), CHECK_TIMEOUT);
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(handled))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(SessionIdentity)
                    .wrap(session)
                    .route("/login", web::post().to(login))
                    .service(
                        web::resource("/task")
                            .wrap(gate.categories())
                            .route(web::post().to(record_task)),
                    )
                    .service(
                        web::resource("/task/{id}")
                            .wrap(gate.task())
                            .route(web::delete().to(record_delete)),
                    ),
            ),
    )
    .await;

    let cookie: Option<Cookie<'static>> = if signed_in {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post().uri("/api/v1/login").to_request(),
        )
        .await;
        assert!(res.status().is_success(), "login should succeed");
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(Cookie::into_owned)
    } else {
        None
    };

    let mut req = match request {
        Gated::CreateTask(body) => actix_test::TestRequest::post()
            .uri("/api/v1/task")
            .insert_header(("content-type", "application/json"))
            .set_payload(body),
        Gated::DeleteTask(id) => actix_test::TestRequest::delete().uri(&format!("/api/v1/task/{id}")),
    };
    if let Some(cookie) = cookie {
        req = req.cookie(cookie);
    }

    let res = actix_test::call_service(&app, req.to_request()).await;
    let status = res.status().as_u16();
    let trace_id = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);
    let bytes = actix_test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("error bodies are JSON")
    };
    Outcome {
        status,
        trace_id,
        body,
    }
}

#[fixture]
fn world() -> OwnershipWorld {
    OwnershipWorld::new()
}

#[given("a signed-in user")]
fn a_signed_in_user(world: &OwnershipWorld) {
    world.signed_in.set(true);
}

#[given("an anonymous caller")]
fn an_anonymous_caller(world: &OwnershipWorld) {
    world.signed_in.set(false);
}

#[given("the ownership service grants access")]
fn the_ownership_service_grants_access(world: &OwnershipWorld) {
    world.answer.set(Answer::Grant);
}

#[given("the ownership service denies access")]
fn the_ownership_service_denies_access(world: &OwnershipWorld) {
    world.answer.set(Answer::Deny);
}

#[given("the ownership service never answers")]
fn the_ownership_service_never_answers(world: &OwnershipWorld) {
    world.answer.set(Answer::Stall);
}

#[when("the user creates a task in one category")]
fn the_user_creates_a_task_in_one_category(world: &OwnershipWorld) {
    // Deliberately irregular whitespace so a re-serialised body would differ.
    let body = format!(
        r#"{{ "title" : "buy milk",  "description":"semi-skimmed", "category_ids": ["{}"] }}"#,
        Uuid::new_v4()
    );
    world.send(Gated::CreateTask(Bytes::from(body)));
}

#[when("the user deletes the task {id}")]
fn the_user_deletes_the_task(world: &OwnershipWorld, id: String) {
    world.send(Gated::DeleteTask(id));
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &OwnershipWorld, status: u16) {
    world.with_outcome(|outcome| {
        assert_eq!(outcome.status, status, "body: {}", outcome.body);
    });
}

#[then("the error message is {message}")]
fn the_error_message_is(world: &OwnershipWorld, message: String) {
    world.with_outcome(|outcome| {
        assert_eq!(
            outcome.body.get("message").and_then(Value::as_str),
            Some(message.as_str())
        );
    });
}

#[then("the response carries a trace id")]
fn the_response_carries_a_trace_id(world: &OwnershipWorld) {
    world.with_outcome(|outcome| {
        let header = outcome.trace_id.as_deref().expect("trace-id header");
        assert_eq!(
            outcome.body.get("traceId").and_then(Value::as_str),
            Some(header)
        );
    });
}

#[then("the task handler received the original body")]
fn the_task_handler_received_the_original_body(world: &OwnershipWorld) {
    let sent = match world.request.borrow().clone() {
        Some(Gated::CreateTask(body)) => body,
        other => panic!("expected a create request, got {other:?}"),
    };
    assert_eq!(world.handled.bodies(), vec![sent]);
}

#[then("the task handler was not invoked")]
fn the_task_handler_was_not_invoked(world: &OwnershipWorld) {
    assert!(world.handled.bodies().is_empty());
}

#[then("the ownership service was not consulted")]
fn the_ownership_service_was_not_consulted(world: &OwnershipWorld) {
    assert_eq!(world.calls.load(Ordering::SeqCst), 0);
}

#[scenario(
    path = "tests/features/ownership_gate.feature",
    name = "Owned categories pass the original body through"
)]
fn owned_categories_pass_the_original_body_through(world: OwnershipWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/ownership_gate.feature",
    name = "Foreign categories are rejected"
)]
fn foreign_categories_are_rejected(world: OwnershipWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/ownership_gate.feature",
    name = "Malformed task identifiers are rejected"
)]
fn malformed_task_identifiers_are_rejected(world: OwnershipWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/ownership_gate.feature",
    name = "Requests without a session are rejected"
)]
fn requests_without_a_session_are_rejected(world: OwnershipWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/ownership_gate.feature",
    name = "Stalled ownership checks time out"
)]
fn stalled_ownership_checks_time_out(world: OwnershipWorld) {
    let _ = world;
}
