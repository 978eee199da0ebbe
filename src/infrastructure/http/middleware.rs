//! HTTP Middleware
//!
//! 请求耗时与 HTTP 状态码错误日志中间件

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

/// HTTP 状态码错误日志中间件
///
/// 4xx 记 warn，5xx 记 error。JSON-RPC 层面的错误走 200，由 McpHandler 自行记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms,
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms,
            "HTTP client error"
        );
    } else {
        tracing::debug!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms,
            "HTTP request"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::{get, post},
        Router,
    };
    use tower::util::ServiceExt;

    fn create_test_router() -> Router {
        Router::new()
            .route("/ok", get(|| async { "OK" }))
            .route("/accepted", post(|| async { StatusCode::ACCEPTED }))
            .route("/unavailable", get(|| async { StatusCode::SERVICE_UNAVAILABLE }))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    async fn status_of(method: &str, uri: &str) -> StatusCode {
        let request = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        create_test_router().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_middleware_passes_responses_through() {
        assert_eq!(status_of("GET", "/ok").await, StatusCode::OK);
        assert_eq!(status_of("POST", "/accepted").await, StatusCode::ACCEPTED);
        assert_eq!(status_of("GET", "/unavailable").await, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_of("GET", "/missing").await, StatusCode::NOT_FOUND);
    }
}
