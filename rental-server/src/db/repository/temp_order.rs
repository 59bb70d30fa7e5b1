//! Pre-order (temp_order) Repository

use super::{RepoError, RepoResult};
use shared::models::TempOrder;
use sqlx::{Sqlite, SqlitePool, Transaction};

const TEMP_ORDER_SELECT: &str = "SELECT id, user_name, user_phone, user_address, wheelchair_id, create_time FROM temp_order";

pub async fn create(pool: &SqlitePool, order: &TempOrder) -> RepoResult<TempOrder> {
    sqlx::query(
        "INSERT INTO temp_order (id, user_name, user_phone, user_address, wheelchair_id, create_time) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(&order.id)
    .bind(&order.user_name)
    .bind(&order.user_phone)
    .bind(&order.user_address)
    .bind(order.wheelchair_id)
    .bind(order.create_time)
    .execute(pool)
    .await?;

    find_by_id(pool, &order.id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create pre-order".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<TempOrder>> {
    let sql = format!("{TEMP_ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, TempOrder>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Consume a pre-order inside the order transaction
///
/// Returns `false` when it was already consumed or removed.
pub async fn delete_in_tx(tx: &mut Transaction<'_, Sqlite>, id: &str) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM temp_order WHERE id = ?")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(rows.rows_affected() == 1)
}

/// Delete every pre-order created before `cutoff_millis`
pub async fn delete_created_before(pool: &SqlitePool, cutoff_millis: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM temp_order WHERE create_time < ?")
        .bind(cutoff_millis)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn temp_order(id: &str, create_time: i64) -> TempOrder {
        TempOrder {
            id: id.to_string(),
            user_name: "张三".to_string(),
            user_phone: "13800138000".to_string(),
            user_address: "北京市朝阳区".to_string(),
            wheelchair_id: 1,
            create_time,
        }
    }

    #[tokio::test]
    async fn test_create_find_delete() {
        let pool = test_pool().await;
        let created = create(&pool, &temp_order("a", 1000)).await.unwrap();
        assert_eq!(created.user_name, "张三");

        let mut tx = pool.begin().await.unwrap();
        assert!(delete_in_tx(&mut tx, "a").await.unwrap());
        assert!(!delete_in_tx(&mut tx, "a").await.unwrap());
        tx.commit().await.unwrap();

        assert!(find_by_id(&pool, "a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_created_before() {
        let pool = test_pool().await;
        create(&pool, &temp_order("old1", 1000)).await.unwrap();
        create(&pool, &temp_order("old2", 2000)).await.unwrap();
        create(&pool, &temp_order("fresh", 5000)).await.unwrap();

        assert_eq!(delete_created_before(&pool, 3000).await.unwrap(), 2);
        assert!(find_by_id(&pool, "fresh").await.unwrap().is_some());
        assert_eq!(delete_created_before(&pool, 3000).await.unwrap(), 0);
    }
}
