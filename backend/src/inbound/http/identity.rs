//! Session-backed identity stage.
//!
//! Login lives in another service; it leaves the user id in the signed
//! session cookie. [`SessionIdentity`] lifts that id into request scope as an
//! [`AuthenticatedUser`] so later stages never touch the session directly.
//! It never rejects: a missing or tampered value leaves the scope empty and
//! the ownership gate answers `401`.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_session::{Session, SessionExt};
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::domain::{AuthenticatedUser, Error as DomainError, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// Persist `user_id` in the session so later requests are authenticated.
///
/// Used by co-located login flows and by test harnesses.
pub fn persist_user(session: &Session, user_id: &UserId) -> Result<(), DomainError> {
    session
        .insert(USER_ID_KEY, user_id.to_string())
        .map_err(|error| DomainError::internal(format!("failed to persist session: {error}")))
}

/// Typed identity previously placed in request scope, if any.
pub fn authenticated_user(req: &ServiceRequest) -> Option<UserId> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .map(AuthenticatedUser::user_id)
}

/// Handler extractor for the identity in request scope.
///
/// Fails with `401` when no identity stage populated the scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl FromRequest for CurrentUser {
    type Error = DomainError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req
            .extensions()
            .get::<AuthenticatedUser>()
            .map(|user| Self(user.user_id()))
            .ok_or_else(|| DomainError::unauthorized("missing user id"));
        ready(user)
    }
}

fn session_user(session: &Session) -> Option<UserId> {
    let raw = match session.get::<String>(USER_ID_KEY) {
        Ok(raw) => raw?,
        Err(error) => {
            warn!(%error, "unreadable user id in session cookie");
            return None;
        }
    };
    match UserId::new(raw) {
        Ok(id) => Some(id),
        Err(error) => {
            warn!(%error, "invalid user id in session cookie");
            None
        }
    }
}

/// Middleware copying the session user into request extensions.
///
/// Must run inside `actix_session::SessionMiddleware`.
///
/// # Examples
/// ```
/// use actix_session::{SessionMiddleware, storage::CookieSessionStore};
/// use actix_web::{App, cookie::Key};
/// use todolist::inbound::http::identity::SessionIdentity;
///
/// let app = App::new().wrap(SessionIdentity).wrap(SessionMiddleware::new(
///     CookieSessionStore::default(),
///     Key::generate(),
/// ));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionIdentity;

impl<S, B> Transform<S, ServiceRequest> for SessionIdentity
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionIdentityMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionIdentityMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Service wrapper produced by [`SessionIdentity`].
pub struct SessionIdentityMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionIdentityMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(user_id) = session_user(&req.get_session()) {
            req.extensions_mut().insert(AuthenticatedUser::new(user_id));
        }
        let service = Rc::clone(&self.service);
        Box::pin(async move { service.call(req).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::test_session_middleware;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpRequest, HttpResponse, test, web};

    const USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => HttpResponse::Ok().body(user.user_id().to_string()),
            None => HttpResponse::NoContent().finish(),
        }
    }

    async fn login(session: Session) -> Result<HttpResponse, DomainError> {
        let id = UserId::new(USER).expect("fixture id");
        persist_user(&session, &id)?;
        Ok(HttpResponse::Ok().finish())
    }

    async fn tamper(session: Session) -> Result<HttpResponse, DomainError> {
        session
            .insert(USER_ID_KEY, "not-a-uuid")
            .map_err(|error| DomainError::internal(error.to_string()))?;
        Ok(HttpResponse::Ok().finish())
    }

    #[actix_web::test]
    async fn session_user_reaches_request_scope() {
        let app = test::init_service(
            App::new()
                .wrap(SessionIdentity)
                .wrap(test_session_middleware())
                .route("/login", web::get().to(login))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/whoami").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, USER);
    }

    #[actix_web::test]
    async fn missing_session_leaves_scope_empty() {
        let app = test::init_service(
            App::new()
                .wrap(SessionIdentity)
                .wrap(test_session_middleware())
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[actix_web::test]
    async fn tampered_session_value_is_ignored() {
        let app = test::init_service(
            App::new()
                .wrap(SessionIdentity)
                .wrap(test_session_middleware())
                .route("/tamper", web::get().to(tamper))
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/tamper").to_request()).await;
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/whoami").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
