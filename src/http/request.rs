//! Request identification middleware.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every request that does not
//!   already carry one
//! - Make the ID available to the handler and to upstream services
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An ID supplied by the client is kept, so callers can correlate across
//!   hops

use axum::http::{HeaderValue, Request};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Tower layer that stamps every request with an `x-request-id` header.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        if !request.headers().contains_key(X_REQUEST_ID) {
            let id = Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&id) {
                request.headers_mut().insert(X_REQUEST_ID, value);
            }
        }
        self.inner.call(request)
    }
}

/// The request ID, or "unknown" when the layer was bypassed.
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use tower::{service_fn, ServiceExt};

    #[tokio::test]
    async fn stamps_missing_request_id() {
        let service = RequestIdLayer.layer(service_fn(|req: Request<Body>| async move {
            Ok::<_, std::convert::Infallible>(request_id(&req))
        }));
        let id = service
            .oneshot(Request::builder().body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_ne!(id, "unknown");
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn keeps_client_supplied_id() {
        let service = RequestIdLayer.layer(service_fn(|req: Request<Body>| async move {
            Ok::<_, std::convert::Infallible>(request_id(&req))
        }));
        let id = service
            .oneshot(
                Request::builder()
                    .header(X_REQUEST_ID, "client-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(id, "client-id");
    }
}
