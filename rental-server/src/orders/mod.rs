//! 订单流转
//!
//! 预订单 → 正式订单 → 配送中 → 已完成，待配送/配送中可取消。
//!
//! - [`precreate`] 只写入 `temp_order`，不占库存
//! - [`submit`] 在一个事务内扣减库存、消费预订单、写入正式订单
//! - [`update_status`] 以旧状态做 compare-and-set，进入已取消时回补库存，
//!   离开已取消时重新占用库存
//! - [`cleanup_expired`] 删除超过 30 分钟的预订单

use chrono::Local;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Order, OrderStatus, OrderStatusUpdate, OrderSubmitted, PreOrderCreate, PreOrderCreated,
    TempOrder, Wheelchair, WheelchairStatus,
};
use sqlx::SqlitePool;

use crate::db::repository::order::NewOrder;
use crate::db::repository::{RepoError, order, temp_order, wheelchair};
use crate::error::{ServiceError, ServiceResult};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, present, require_fields, validate_phone, validate_text_len,
};

/// 订单号冲突时的重试次数
const ORDER_NO_ATTEMPTS: usize = 3;

/// `WR` + 本地时间 `YYYYMMDDHHMMSS` + 6 位大写十六进制
pub fn generate_order_no() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("WR{}{}", Local::now().format("%Y%m%d%H%M%S"), suffix)
}

/// 可下单的轮椅: 存在且在售，且有库存
async fn load_rentable(pool: &SqlitePool, wheelchair_id: i64) -> ServiceResult<Wheelchair> {
    let w = wheelchair::find_by_id(pool, wheelchair_id)
        .await?
        .filter(|w| w.status == WheelchairStatus::Active)
        .ok_or(ErrorCode::WheelchairUnavailable)?;
    if w.stock <= 0 {
        return Err(ErrorCode::WheelchairOutOfStock.into());
    }
    Ok(w)
}

/// 创建预订单
pub async fn precreate(pool: &SqlitePool, req: PreOrderCreate) -> ServiceResult<PreOrderCreated> {
    let name = present(&req.name);
    let phone = present(&req.phone);
    let address = present(&req.address);
    require_fields(&[
        ("name", name.is_some()),
        ("phone", phone.is_some()),
        ("address", address.is_some()),
        ("wheelchair_id", req.wheelchair_id.is_some()),
    ])?;
    let (Some(name), Some(phone), Some(address), Some(wheelchair_id)) =
        (name, phone, address, req.wheelchair_id)
    else {
        return Err(AppError::missing_fields(&["name", "phone", "address", "wheelchair_id"]).into());
    };

    validate_phone(phone)?;
    validate_text_len(name, "姓名", MAX_NAME_LEN)?;
    validate_text_len(address, "地址", MAX_ADDRESS_LEN)?;

    let w = load_rentable(pool, wheelchair_id).await?;

    let temp = temp_order::create(
        pool,
        &TempOrder {
            id: uuid::Uuid::new_v4().to_string(),
            user_name: name.to_string(),
            user_phone: phone.to_string(),
            user_address: address.to_string(),
            wheelchair_id: w.id,
            create_time: shared::util::now_millis(),
        },
    )
    .await?;

    tracing::info!(pre_order_id = %temp.id, wheelchair_id = w.id, "Pre-order created");

    Ok(PreOrderCreated {
        expire_time: shared::util::format_millis(temp.expire_time()),
        pre_order_id: temp.id,
        wheelchair: w,
    })
}

/// 预订单转正式订单
pub async fn submit(pool: &SqlitePool, pre_order_id: Option<&str>) -> ServiceResult<OrderSubmitted> {
    let pre_order_id = pre_order_id
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ErrorCode::PreOrderIdRequired)?;

    let temp = temp_order::find_by_id(pool, pre_order_id)
        .await?
        .ok_or(ErrorCode::PreOrderNotFound)?;
    if temp.is_expired_at(shared::util::now_millis()) {
        return Err(ErrorCode::PreOrderExpired.into());
    }
    load_rentable(pool, temp.wheelchair_id).await?;

    // 事务内任何错误返回时 tx 被丢弃，自动回滚
    let mut tx = pool.begin().await?;

    if !wheelchair::decrement_stock(&mut tx, temp.wheelchair_id).await? {
        return Err(ErrorCode::WheelchairOutOfStock.into());
    }
    if !temp_order::delete_in_tx(&mut tx, &temp.id).await? {
        return Err(ErrorCode::PreOrderNotFound.into());
    }
    let deposit = wheelchair::price_in_tx(&mut tx, temp.wheelchair_id).await?;

    let mut new_order = NewOrder {
        order_no: generate_order_no(),
        user_name: temp.user_name,
        user_phone: temp.user_phone,
        user_address: temp.user_address,
        wheelchair_id: temp.wheelchair_id,
        deposit,
    };
    let mut attempt = 1;
    let order_id = loop {
        match order::insert_in_tx(&mut tx, &new_order).await {
            Ok(id) => break id,
            Err(RepoError::Duplicate(_)) if attempt < ORDER_NO_ATTEMPTS => {
                attempt += 1;
                new_order.order_no = generate_order_no();
            }
            Err(e) => return Err(e.into()),
        }
    };

    tx.commit().await?;

    let order_info = order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| ServiceError::Db("Order vanished after commit".into()))?;

    tracing::info!(
        order_no = %order_info.order_no,
        order_id,
        wheelchair_id = order_info.wheelchair_id,
        deposit,
        "Order submitted"
    );

    Ok(OrderSubmitted {
        order_no: order_info.order_no.clone(),
        order_id,
        order_info,
    })
}

/// 解析状态更新请求
pub fn parse_status_update(req: &OrderStatusUpdate) -> Result<(i64, OrderStatus), AppError> {
    let new_status = present(&req.new_status);
    require_fields(&[
        ("order_id", req.order_id.is_some()),
        ("new_status", new_status.is_some()),
    ])?;
    let (Some(order_id), Some(new_status)) = (req.order_id, new_status) else {
        return Err(AppError::missing_fields(&["order_id", "new_status"]));
    };
    let status = OrderStatus::from_db(new_status).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::InvalidOrderStatus,
            format!("无效的订单状态: {new_status}"),
        )
    })?;
    Ok((order_id, status))
}

/// 后台修改订单状态
///
/// Returns the previous status and the updated order.
pub async fn update_status(
    pool: &SqlitePool,
    order_id: i64,
    new_status: OrderStatus,
) -> ServiceResult<(OrderStatus, Order)> {
    let current = order::find_by_id(pool, order_id)
        .await?
        .ok_or(ErrorCode::OrderNotFound)?;
    let old_status = current.status;
    if old_status == new_status {
        return Err(ErrorCode::OrderStatusUnchanged.into());
    }

    let mut tx = pool.begin().await?;

    // 并发修改时旧状态已不匹配
    if !order::update_status_in_tx(&mut tx, order_id, old_status, new_status).await? {
        return Err(ErrorCode::OrderStatusUnchanged.into());
    }

    if !new_status.holds_stock() {
        wheelchair::increment_stock(&mut tx, current.wheelchair_id).await?;
    } else if !old_status.holds_stock()
        && !wheelchair::decrement_stock(&mut tx, current.wheelchair_id).await?
    {
        return Err(ErrorCode::WheelchairOutOfStock.into());
    }

    tx.commit().await?;

    let updated = order::find_by_id(pool, order_id)
        .await?
        .ok_or(ErrorCode::OrderNotFound)?;

    tracing::info!(
        order_id,
        from = old_status.as_str(),
        to = new_status.as_str(),
        "Order status updated"
    );

    Ok((old_status, updated))
}

/// 删除所有已过期 (创建超过 30 分钟) 的预订单，返回删除数量
pub async fn cleanup_expired(pool: &SqlitePool) -> ServiceResult<u64> {
    let cutoff = shared::util::now_millis() - TempOrder::HOLD_MILLIS;
    let removed = temp_order::delete_created_before(pool, cutoff).await?;
    if removed > 0 {
        tracing::info!(removed, "Expired pre-orders removed");
    }
    Ok(removed)
}
