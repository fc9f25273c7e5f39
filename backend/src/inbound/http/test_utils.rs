//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::HttpMessage;
use actix_web::cookie::Key;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{Ready, ready};

use crate::domain::{AuthenticatedUser, UserId};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Middleware standing in for the authentication stage.
///
/// `WithUser(Some(id))` places `id` in request scope; `WithUser(None)` leaves
/// the scope empty.
#[derive(Debug, Clone, Copy)]
pub struct WithUser(pub Option<UserId>);

impl<S, B> Transform<S, ServiceRequest> for WithUser
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = WithUserMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(WithUserMiddleware {
            service,
            user: self.0,
        }))
    }
}

/// Service wrapper produced by [`WithUser`].
pub struct WithUserMiddleware<S> {
    service: S,
    user: Option<UserId>,
}

impl<S, B> Service<ServiceRequest> for WithUserMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = S::Future;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(user) = self.user {
            req.extensions_mut().insert(AuthenticatedUser::new(user));
        }
        self.service.call(req)
    }
}
