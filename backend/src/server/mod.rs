//! Server construction and middleware wiring.

mod config;

pub use config::{ServerConfig, ServerSettings, SettingsError};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use todolist::Trace;
#[cfg(debug_assertions)]
use todolist::doc::ApiDoc;
use todolist::domain::ports::{FixtureOwnershipChecker, OwnershipChecker};
use todolist::inbound::http::categories::{create_category, delete_category, list_categories};
use todolist::inbound::http::identity::SessionIdentity;
use todolist::inbound::http::ownership::OwnershipGate;
use todolist::inbound::http::state::HttpState;
use todolist::inbound::http::tasks;
use todolist::inbound::http::validation::{json_error_handler, path_error_handler};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    gate: OwnershipGate,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
    body_limit: usize,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        gate,
        key,
        cookie_secure,
        same_site,
        body_limit,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(SessionIdentity)
        .wrap(session)
        .service(create_category)
        .service(list_categories)
        .service(delete_category)
        .configure(|cfg| tasks::configure(cfg, &gate));

    let app = App::new()
        .app_data(http_state)
        .app_data(
            web::JsonConfig::default()
                .limit(body_limit)
                .error_handler(json_error_handler),
        )
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(Trace)
        .service(api);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server from a validated [`ServerConfig`].
///
/// Ports are wired to their fixture implementations until real adapters
/// exist.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let http_state = web::Data::new(HttpState::default());
    let checker: Arc<dyn OwnershipChecker> = Arc::new(FixtureOwnershipChecker);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ownership_timeout,
        body_limit,
    } = config;
    let gate = OwnershipGate::new(checker, ownership_timeout).with_body_limit(body_limit);

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            gate: gate.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            body_limit,
        })
    })
    .bind(bind_addr)?
    .run();

    info!(
        %bind_addr,
        ownership_timeout_ms = u64::try_from(ownership_timeout.as_millis()).unwrap_or(u64::MAX),
        body_limit,
        "server listening"
    );
    Ok(server)
}
