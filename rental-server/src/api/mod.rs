//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查与 API 索引 (公共)
//! - [`wheelchairs`] - 客户端轮椅检索
//! - [`orders`] - 客户端预订单与下单
//! - [`admin`] - 后台接口 (登录、库存、订单、账号、操作日志)
//!
//! 所有响应都使用 [`ApiResponse`] 信封，未匹配的路径返回 404 信封。

pub mod admin;
pub mod extract;
pub mod health;
pub mod orders;
pub mod wheelchairs;

use std::any::Any;

use axum::Router;
use axum::middleware as axum_middleware;
use axum::response::{IntoResponse, Response};
use http::{HeaderName, HeaderValue, Method, header};
use shared::error::{ApiResponse, AppError, ErrorCode};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::middleware;
use crate::state::AppState;

pub use extract::{AppJson, AppPath, AppQuery};

/// Handler result: success envelope or error envelope
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware)
pub fn build_router(state: &AppState) -> Router<AppState> {
    Router::new()
        // Public
        .merge(health::router())
        // Client API - public
        .merge(wheelchairs::router())
        .merge(orders::router())
        // Admin API - token required except login
        .merge(admin::router(state))
        .fallback(not_found)
}

/// Build the fully configured application with middleware and state
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    build_router(&state)
        // Request logging
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        // Trace - per-request spans
        .layer(TraceLayer::new_for_http())
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // Request ID - outer, so the logging middleware sees it
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(cors)
        // Panics become a 500 envelope
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Log an unexpected failure and answer with a bare 500
pub(crate) fn internal_error(context: &str, err: impl std::fmt::Display) -> AppError {
    tracing::error!(error = %err, "{context}");
    AppError::new(ErrorCode::InternalError)
}

async fn not_found() -> AppError {
    AppError::not_found()
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(panic = %detail, "Handler panicked");
    ApiResponse::<()>::from(AppError::new(ErrorCode::InternalError)).into_response()
}
