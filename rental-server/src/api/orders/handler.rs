//! Client Order Handlers

use axum::extract::State;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Order, OrderSubmit, OrderSubmitted, PreOrderCreate, PreOrderCreated};

use crate::api::{ApiResult, AppJson, AppPath};
use crate::db::repository::order;
use crate::orders;
use crate::state::AppState;

/// POST /api/order/precreate - 创建预订单
pub async fn precreate(
    State(state): State<AppState>,
    AppJson(req): AppJson<PreOrderCreate>,
) -> ApiResult<PreOrderCreated> {
    let created = orders::precreate(&state.pool, req).await?;
    Ok(ApiResponse::success_with_message(
        "预订单创建成功，请在30分钟内提交订单",
        created,
    ))
}

/// POST /api/order/submit - 提交订单
pub async fn submit(
    State(state): State<AppState>,
    AppJson(req): AppJson<OrderSubmit>,
) -> ApiResult<OrderSubmitted> {
    let submitted = orders::submit(&state.pool, req.pre_order_id.as_deref()).await?;
    Ok(ApiResponse::success_with_message("订单提交成功", submitted))
}

/// GET /api/order/detail/{order_no} - 订单查询
pub async fn detail(
    State(state): State<AppState>,
    AppPath(order_no): AppPath<String>,
) -> ApiResult<Order> {
    let found = order::find_by_order_no(&state.pool, order_no.trim())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(ApiResponse::success(found))
}
