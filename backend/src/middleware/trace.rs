//! Tracing middleware attaching a request-scoped trace identifier.
//!
//! Every request runs inside [`TraceId::scope`], so ownership decisions and
//! error envelopes produced further down the chain carry the same identifier
//! that is echoed back in the `trace-id` response header.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, error};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Tracing middleware attaching a request-scoped UUID and adding a
/// `trace-id` header to every response.
///
/// Handlers and downstream middleware read the identifier via
/// [`TraceId::current`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use todolist::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
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
        let trace_id = TraceId::generate();
        let method = req.method().clone();
        let path = req.path().to_owned();
        let fut = self.service.call(req);
        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = fut.await?;
            debug!(
                trace_id = %trace_id,
                %method,
                %path,
                status = res.status().as_u16(),
                "request completed"
            );
            match HeaderValue::from_str(&trace_id.to_string()) {
                Ok(value) => {
                    res.response_mut()
                        .headers_mut()
                        .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
                Err(error) => {
                    error!(
                        %error,
                        trace_id = %trace_id,
                        "failed to encode trace identifier header"
                    );
                }
            }
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApiResult, Error as DomainError};
    use actix_web::{App, HttpResponse, test, web};
    use std::future::Future;

    async fn call_with_trace<F, Fut, Res>(handler: F) -> (ServiceResponse, String)
    where
        F: Fn() -> Fut + Clone + 'static,
        Fut: Future<Output = Res> + 'static,
        Res: actix_web::Responder + 'static,
    {
        let app =
            test::init_service(App::new().wrap(Trace).route("/", web::get().to(handler))).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let res = test::call_service(&app, req).await;
        let trace_id = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("header is ascii")
            .to_owned();
        (res, trace_id)
    }

    #[actix_web::test]
    async fn adds_trace_id_header() {
        let (_, trace_id) = call_with_trace(|| async { HttpResponse::Ok().finish() }).await;
        assert!(trace_id.parse::<TraceId>().is_ok());
    }

    #[actix_web::test]
    async fn exposes_trace_id_in_handler() {
        let (res, trace_id) = call_with_trace(|| async move {
            let id = TraceId::current().expect("trace id in scope");
            HttpResponse::Ok().body(id.to_string())
        })
        .await;
        let body = test::read_body(res).await;
        let body = std::str::from_utf8(&body).expect("utf8 body");
        assert_eq!(trace_id, body);
    }

    #[actix_web::test]
    async fn propagates_trace_id_in_error() {
        let (res, trace_id) = call_with_trace(|| async move {
            ApiResult::<HttpResponse>::Err(DomainError::forbidden("nope"))
        })
        .await;
        let body: DomainError = test::read_body_json(res).await;
        assert_eq!(body.trace_id(), Some(trace_id.as_str()));
    }
}
