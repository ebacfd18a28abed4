use crate::server::error::Error;
use axum::{
    http::{Method, Request},
    response::{IntoResponse, Response},
};
use core::task::{Context, Poll};
use futures::future::{Either, Ready, ready};
use tower::{Layer, Service};

/// Wraps a service so it only runs for one HTTP method.
///
/// Any other method is answered immediately with [`Error::MethodNotAllowed`]
/// and the inner service is never called.
#[derive(Clone, Debug)]
pub struct MethodGuardLayer {
    method: Method,
}

impl MethodGuardLayer {
    pub const fn new(method: Method) -> Self {
        Self { method }
    }
}

impl<S> Layer<S> for MethodGuardLayer {
    type Service = MethodGuard<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MethodGuard {
            inner,
            method: self.method.clone(),
        }
    }
}

/// Service produced by [`MethodGuardLayer`].
#[derive(Clone, Debug)]
pub struct MethodGuard<S> {
    inner: S,
    method: Method,
}

impl<S, B> Service<Request<B>> for MethodGuard<S>
where
    S: Service<Request<B>, Response = Response>,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Either<Ready<Result<Response, S::Error>>, S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        if *req.method() == self.method {
            Either::Right(self.inner.call(req))
        } else {
            Either::Left(ready(Ok(Error::MethodNotAllowed.into_response())))
        }
    }
}
