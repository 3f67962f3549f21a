//! HTTP 应用组装
//!
//! 合并所有 API 路由并挂载中间件

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// HTTP 请求日志中间件
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = std::time::Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    tracing::info!(
        target: "http_access",
        elapsed_ms = started.elapsed().as_millis() as u64,
        "{} {} {}",
        method,
        uri,
        status
    );

    response
}

/// Build the Axum application with state and middleware
pub fn build_app(state: ServerState) -> Router {
    crate::api::router()
        .with_state(state)
        // Tower HTTP 中间件
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
}
