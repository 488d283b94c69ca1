//! Request-id propagation for logs and error bodies.

use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::future::Future;
use tracing::Instrument;
use uuid::Uuid;

/// Header name for the request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self(format!("req-{}", Uuid::new_v4().simple()))
    }
}

tokio::task_local! {
    static REQUEST_ID: RequestId;
}

/// Runs `fut` with the given request id installed in the task-local scope.
pub async fn scope_request_id<F>(request_id: RequestId, fut: F) -> F::Output
where
    F: Future,
{
    REQUEST_ID.scope(request_id, fut).await
}

/// The request id of the request currently being served, if any.
pub fn current_request_id() -> Option<RequestId> {
    REQUEST_ID.try_with(|rid| rid.clone()).ok()
}

/// Middleware that assigns (or propagates) a request id, installs it in the
/// task-local scope, and echoes it on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(RequestId::new)
        .unwrap_or_default();

    request.extensions_mut().insert(request_id.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id.as_str(),
        method = %request.method(),
        uri = %request.uri(),
    );

    let mut response = scope_request_id(
        request_id.clone(),
        async move { next.run(request).await }.instrument(span),
    )
    .await;

    // Request ids are generated ASCII, so this conversion cannot fail.
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request as HttpRequest, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    async fn handler() -> (StatusCode, String) {
        let rid = current_request_id().map(|r| r.as_str().to_string());
        (StatusCode::OK, rid.unwrap_or_default())
    }

    #[tokio::test]
    async fn middleware_assigns_and_echoes_request_id() {
        let app = Router::new()
            .route("/", get(handler))
            .layer(axum::middleware::from_fn(request_id_middleware));

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let header = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .expect("response carries request id");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(String::from_utf8(body.to_vec()).unwrap(), header);
    }

    #[tokio::test]
    async fn middleware_propagates_caller_supplied_id() {
        let app = Router::new()
            .route("/", get(handler))
            .layer(axum::middleware::from_fn(request_id_middleware));

        let response = app
            .oneshot(
                HttpRequest::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "req-caller-1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(REQUEST_ID_HEADER).unwrap(),
            "req-caller-1"
        );
    }
}
