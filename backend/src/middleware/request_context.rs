//! Request context made available to the central error responder.
//!
//! `ResponseError::error_response` only sees the error value, yet the error
//! responder needs the request method (foreign-key violations depend on it),
//! the path (for logging) and whether diagnostics may be exposed. The
//! [`ErrorContext`] middleware stores those in task-local storage for the
//! duration of each request, the same way [`Trace`](super::Trace) scopes the
//! trace identifier.
//!
//! Errors that reach this middleware as `Err` (rather than as an error
//! response) are forwarded unchanged so that a response is never written
//! twice.

use std::future::Future;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tokio::task_local;

use crate::domain::HttpMethod;

task_local! {
    static REQUEST_CONTEXT: RequestContext;
}

/// Request facts consulted while rendering errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    method: HttpMethod,
    path: String,
    expose_details: bool,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            method: HttpMethod::Other,
            path: String::new(),
            expose_details: false,
        }
    }
}

impl RequestContext {
    /// Build a context.
    pub fn new(method: HttpMethod, path: impl Into<String>, expose_details: bool) -> Self {
        Self {
            method,
            path: path.into(),
            expose_details,
        }
    }

    /// Context of the request being served, or a production-safe default
    /// outside any request.
    #[must_use]
    pub fn current() -> Self {
        REQUEST_CONTEXT
            .try_with(Clone::clone)
            .unwrap_or_default()
    }

    /// Run `fut` with `context` in scope.
    pub async fn scope<Fut>(context: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        REQUEST_CONTEXT.scope(context, fut).await
    }

    /// Request method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether error responses may carry diagnostic details.
    #[must_use]
    pub const fn expose_details(&self) -> bool {
        self.expose_details
    }
}

/// Map an actix method onto the storage error mapper's method set.
#[must_use]
pub fn http_method(method: &Method) -> HttpMethod {
    match *method {
        Method::GET => HttpMethod::Get,
        Method::POST => HttpMethod::Post,
        Method::PUT => HttpMethod::Put,
        Method::PATCH => HttpMethod::Patch,
        Method::DELETE => HttpMethod::Delete,
        _ => HttpMethod::Other,
    }
}

/// Middleware scoping a [`RequestContext`] around every request.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use sac_backend::middleware::ErrorContext;
///
/// let _app = App::new().wrap(ErrorContext::new(false));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ErrorContext {
    expose_details: bool,
}

impl ErrorContext {
    /// Create the middleware; `expose_details` is fixed for the process.
    #[must_use]
    pub const fn new(expose_details: bool) -> Self {
        Self { expose_details }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ErrorContext
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorContextMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorContextMiddleware {
            service,
            expose_details: self.expose_details,
        }))
    }
}

/// Service wrapper produced by [`ErrorContext`].
pub struct ErrorContextMiddleware<S> {
    service: S,
    expose_details: bool,
}

impl<S, B> Service<ServiceRequest> for ErrorContextMiddleware<S>
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
        let context = RequestContext::new(
            http_method(req.method()),
            req.path(),
            self.expose_details,
        );
        let fut = self.service.call(req);
        Box::pin(RequestContext::scope(context, fut))
    }
}
