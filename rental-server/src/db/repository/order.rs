//! Formal Order Repository

use super::RepoResult;
use shared::models::{Order, OrderStatus, Pagination};
use sqlx::{Sqlite, SqlitePool, Transaction};

const ORDER_SELECT: &str = "SELECT o.id, o.order_no, o.user_name, o.user_phone, o.user_address, o.wheelchair_id, w.name AS wheelchair_name, o.deposit, o.status, o.create_time FROM formal_order o LEFT JOIN wheelchair w ON o.wheelchair_id = w.id";

/// Row to insert on submit
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_no: String,
    pub user_name: String,
    pub user_phone: String,
    pub user_address: String,
    pub wheelchair_id: i64,
    pub deposit: f64,
}

/// Insert a 待配送 order, returning its id
pub async fn insert_in_tx(tx: &mut Transaction<'_, Sqlite>, order: &NewOrder) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO formal_order (order_no, user_name, user_phone, user_address, wheelchair_id, deposit, status, create_time) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING id",
    )
    .bind(&order.order_no)
    .bind(&order.user_name)
    .bind(&order.user_phone)
    .bind(&order.user_address)
    .bind(order.wheelchair_id)
    .bind(order.deposit)
    .bind(OrderStatus::Pending)
    .bind(now)
    .fetch_one(&mut **tx)
    .await?;
    Ok(id)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE o.id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_order_no(pool: &SqlitePool, order_no: &str) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE o.order_no = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(order_no)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Newest-first page of orders, optionally filtered by status
pub async fn list(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
    pagination: Pagination,
) -> RepoResult<(Vec<Order>, i64)> {
    let (total, rows) = match status {
        Some(status) => {
            let total: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM formal_order WHERE status = ?")
                    .bind(status)
                    .fetch_one(pool)
                    .await?;
            let sql = format!("{ORDER_SELECT} WHERE o.status = ? ORDER BY o.id DESC LIMIT ? OFFSET ?");
            let rows = sqlx::query_as::<_, Order>(&sql)
                .bind(status)
                .bind(pagination.limit as i64)
                .bind(pagination.offset())
                .fetch_all(pool)
                .await?;
            (total, rows)
        }
        None => {
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM formal_order")
                .fetch_one(pool)
                .await?;
            let sql = format!("{ORDER_SELECT} ORDER BY o.id DESC LIMIT ? OFFSET ?");
            let rows = sqlx::query_as::<_, Order>(&sql)
                .bind(pagination.limit as i64)
                .bind(pagination.offset())
                .fetch_all(pool)
                .await?;
            (total, rows)
        }
    };
    Ok((rows, total))
}

/// Compare-and-set the status: only applies while the order is still in `from`
pub async fn update_status_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE formal_order SET status = ?1 WHERE id = ?2 AND status = ?3")
        .bind(to)
        .bind(id)
        .bind(from)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected() == 1)
}
