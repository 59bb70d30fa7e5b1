//! 请求日志中间件
//!
//! 记录每个 HTTP 请求的方法、路径、状态码和耗时

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

use crate::auth::CurrentUser;

/// 请求日志中间件
///
/// 记录以下信息：
/// - 请求 ID (x-request-id, 由 SetRequestIdLayer 生成)
/// - HTTP 方法和匹配的路由
/// - 认证用户 (如果存在)
/// - 响应状态码与延迟 (毫秒)
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;

    let latency = start.elapsed();
    let status = response.status();
    // require_auth 把用户同时放进响应扩展
    let user = response
        .extensions()
        .get::<CurrentUser>()
        .map(|u| format!("{}({})", u.username, u.id));

    if status.is_server_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            user = ?user,
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            user = ?user,
            "Request completed with client error"
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            user = ?user,
            "Request completed"
        );
    }

    response
}
