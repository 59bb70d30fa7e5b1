//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 健康检查 | 无 |
//! | / | GET | API 索引 | 无 |

use axum::{Router, routing::get};
use serde::Serialize;
use shared::error::ApiResponse;

use crate::state::AppState;

const SERVICE_NAME: &str = "在线轮椅租赁系统";

/// 健康检查路由 - 公共路由 (无需认证)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
}

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    service: &'static str,
    version: &'static str,
    /// healthy
    status: &'static str,
}

async fn health() -> ApiResponse<HealthResponse> {
    ApiResponse::success_with_message(
        "服务运行正常",
        HealthResponse {
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            status: "healthy",
        },
    )
}

/// API 索引响应
#[derive(Serialize)]
pub struct IndexResponse {
    service: &'static str,
    version: &'static str,
    endpoints: Endpoints,
}

#[derive(Serialize)]
pub struct Endpoints {
    client: &'static [&'static str],
    admin: &'static [&'static str],
}

async fn index() -> ApiResponse<IndexResponse> {
    ApiResponse::success_with_message(
        "欢迎使用在线轮椅租赁系统API",
        IndexResponse {
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            endpoints: Endpoints {
                client: &[
                    "GET /api/wheelchair/search",
                    "GET /api/wheelchair/detail/{id}",
                    "POST /api/order/precreate",
                    "POST /api/order/submit",
                    "GET /api/order/detail/{order_no}",
                ],
                admin: &[
                    "POST /api/admin/login",
                    "POST /api/admin/logout",
                    "GET /api/admin/profile",
                    "POST /api/admin/change-password",
                    "GET /api/admin/inventory/list",
                    "GET /api/admin/inventory/detail/{id}",
                    "POST /api/admin/inventory/save",
                    "POST /api/admin/inventory/operate",
                    "GET /api/admin/order/list",
                    "GET /api/admin/order/detail/{id}",
                    "POST /api/admin/order/update/status",
                    "POST /api/admin/order/cleanup-temp",
                    "GET /api/admin/log/list",
                    "GET /api/admin/log/stats",
                    "GET /api/admin/user/list",
                    "POST /api/admin/user/save",
                    "POST /api/admin/user/delete",
                ],
            },
        },
    )
}
