//! Admin Order Handlers

use axum::extract::State;
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{
    OperateType, Order, OrderStatus, OrderStatusUpdate, PaginatedResponse, Pagination,
};

use crate::api::{ApiResult, AppJson, AppPath, AppQuery};
use crate::audit;
use crate::auth::CurrentUser;
use crate::db::repository::order;
use crate::orders;
use crate::state::AppState;
use crate::utils::validation::present;

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    /// 中文状态名，空表示全部
    pub status: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderResult {
    pub order: Order,
}

#[derive(Debug, Serialize)]
pub struct CleanupResult {
    pub removed: u64,
}

/// GET /api/admin/order/list - 订单列表
pub async fn list(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<OrderListQuery>,
) -> ApiResult<PaginatedResponse<Order>> {
    let pagination = Pagination::parse(query.page.as_deref(), query.limit.as_deref());
    let status = match present(&query.status) {
        Some(raw) => Some(OrderStatus::from_db(raw).ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidOrderStatus,
                format!("无效的订单状态: {raw}"),
            )
        })?),
        None => None,
    };

    let (list, total) = order::list(&state.pool, status, pagination).await?;
    Ok(ApiResponse::success(PaginatedResponse::new(
        list, total, pagination,
    )))
}

/// GET /api/admin/order/detail/{id}
pub async fn detail(State(state): State<AppState>, AppPath(id): AppPath<i64>) -> ApiResult<Order> {
    let found = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(ApiResponse::success(found))
}

/// POST /api/admin/order/update/status - 修改订单状态
///
/// 进入 `已取消` 归还 1 件库存；从 `已取消` 恢复会重新占用库存。
pub async fn update_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    AppJson(req): AppJson<OrderStatusUpdate>,
) -> ApiResult<OrderResult> {
    let (order_id, new_status) = orders::parse_status_update(&req)?;
    let (old_status, updated) = orders::update_status(&state.pool, order_id, new_status).await?;

    let log_type = if new_status == OrderStatus::Cancelled {
        OperateType::CancelOrder
    } else {
        OperateType::UpdateOrderStatus
    };
    audit::record(&state.pool, &current_user, log_type, Some(order_id)).await;

    Ok(ApiResponse::success_with_message(
        format!(
            "订单状态从 {} 更新为 {}",
            old_status.as_str(),
            new_status.as_str()
        ),
        OrderResult { order: updated },
    ))
}

/// POST /api/admin/order/cleanup-temp - 清理过期预订单
pub async fn cleanup_temp(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> ApiResult<CleanupResult> {
    let removed = orders::cleanup_expired(&state.pool).await?;
    audit::record(&state.pool, &current_user, OperateType::CleanupTempOrders, None).await;
    Ok(ApiResponse::success_with_message(
        format!("已清理{removed}个过期预订单"),
        CleanupResult { removed },
    ))
}
