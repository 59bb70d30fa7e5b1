//! Wheelchair Repository

use super::{RepoError, RepoResult, like_pattern};
use shared::models::{Pagination, Wheelchair, WheelchairStatus};
use sqlx::{Sqlite, SqlitePool, Transaction};

const WHEELCHAIR_SELECT: &str = "SELECT id, name, description, price, stock, manufacturer, status, create_time, update_time FROM wheelchair";

const KEYWORD_CLAUSE: &str =
    "(name LIKE ?1 ESCAPE '\\' OR description LIKE ?1 ESCAPE '\\' OR manufacturer LIKE ?1 ESCAPE '\\')";

/// 排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WheelchairSort {
    PriceAsc,
    PriceDesc,
    /// `id DESC`
    #[default]
    Newest,
}

impl WheelchairSort {
    /// `price_asc` / `price_desc`, anything else is newest-first
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            _ => Self::Newest,
        }
    }

    fn order_by(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price ASC, id DESC",
            Self::PriceDesc => "price DESC, id DESC",
            Self::Newest => "id DESC",
        }
    }
}

/// Catalog query
#[derive(Debug, Clone, Default)]
pub struct WheelchairFilter {
    pub keyword: Option<String>,
    pub sort: WheelchairSort,
    /// 包含已下架 (后台库存列表)
    pub include_offline: bool,
}

/// Editable wheelchair fields
#[derive(Debug, Clone)]
pub struct WheelchairFields {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub manufacturer: Option<String>,
}

/// Keyword search with sorting and pagination; deleted rows never match
pub async fn search(
    pool: &SqlitePool,
    filter: &WheelchairFilter,
    pagination: Pagination,
) -> RepoResult<(Vec<Wheelchair>, i64)> {
    let status_clause = if filter.include_offline {
        "status IN ('active', 'offline')"
    } else {
        "status = 'active'"
    };
    let keyword = filter
        .keyword
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());

    let where_clause = match keyword {
        Some(_) => format!("WHERE {status_clause} AND {KEYWORD_CLAUSE}"),
        None => format!("WHERE {status_clause}"),
    };

    let count_sql = format!("SELECT COUNT(*) FROM wheelchair {where_clause}");
    let list_sql = format!(
        "{WHEELCHAIR_SELECT} {where_clause} ORDER BY {} LIMIT ? OFFSET ?",
        filter.sort.order_by()
    );
    let pattern = keyword.map(like_pattern);

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut list_query = sqlx::query_as::<_, Wheelchair>(&list_sql);
    if let Some(pattern) = &pattern {
        count_query = count_query.bind(pattern);
        list_query = list_query.bind(pattern);
    }

    let total = count_query.fetch_one(pool).await?;
    let rows = list_query
        .bind(pagination.limit as i64)
        .bind(pagination.offset())
        .fetch_all(pool)
        .await?;

    Ok((rows, total))
}

/// Find by id regardless of status
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Wheelchair>> {
    let sql = format!("{WHEELCHAIR_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Wheelchair>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &WheelchairFields) -> RepoResult<Wheelchair> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO wheelchair (name, description, price, stock, manufacturer, status, create_time, update_time) VALUES (?1, ?2, ?3, ?4, ?5, 'active', ?6, ?6) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.stock)
    .bind(&data.manufacturer)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create wheelchair".into()))
}

/// Overwrite editable fields of a non-deleted wheelchair
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: &WheelchairFields,
) -> RepoResult<Wheelchair> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE wheelchair SET name = ?1, description = ?2, price = ?3, stock = ?4, manufacturer = ?5, update_time = ?6 WHERE id = ?7 AND status != 'deleted'",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.price)
    .bind(data.stock)
    .bind(&data.manufacturer)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Wheelchair {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Wheelchair {id} not found")))
}

/// Change the lifecycle status of a non-deleted wheelchair
///
/// Returns `false` when the wheelchair is missing or already deleted.
pub async fn set_status(pool: &SqlitePool, id: i64, status: WheelchairStatus) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE wheelchair SET status = ?1, update_time = ?2 WHERE id = ?3 AND status != 'deleted'",
    )
    .bind(status)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Change the status of several wheelchairs at once, skipping deleted rows
///
/// Returns the ids actually changed; unknown and deleted ids are absent.
pub async fn batch_set_status(
    pool: &SqlitePool,
    ids: &[i64],
    status: WheelchairStatus,
) -> RepoResult<Vec<i64>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let now = shared::util::now_millis();
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "UPDATE wheelchair SET status = ?, update_time = ? WHERE status != 'deleted' AND id IN ({placeholders}) RETURNING id"
    );

    let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(status).bind(now);
    for id in ids {
        query = query.bind(*id);
    }
    let mut changed = query.fetch_all(pool).await?;
    changed.sort_unstable();
    Ok(changed)
}

/// Reserve one unit: `stock - 1` only while active and in stock
///
/// Returns `false` when the guard did not match (sold out, offline, deleted).
pub async fn decrement_stock(tx: &mut Transaction<'_, Sqlite>, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE wheelchair SET stock = stock - 1, update_time = ?1 WHERE id = ?2 AND stock > 0 AND status = 'active'",
    )
    .bind(now)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Return one unit to stock (order cancelled)
pub async fn increment_stock(tx: &mut Transaction<'_, Sqlite>, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE wheelchair SET stock = stock + 1, update_time = ?1 WHERE id = ?2",
    )
    .bind(now)
    .bind(id)
    .execute(&mut **tx)
    .await?;
    Ok(rows.rows_affected() == 1)
}

/// Current price, read inside the order transaction
pub async fn price_in_tx(tx: &mut Transaction<'_, Sqlite>, id: i64) -> RepoResult<f64> {
    let price: f64 = sqlx::query_scalar("SELECT price FROM wheelchair WHERE id = ?")
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    fn fields(name: &str, price: f64, stock: i64) -> WheelchairFields {
        WheelchairFields {
            name: name.to_string(),
            description: None,
            price,
            stock,
            manufacturer: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let pool = test_pool().await;
        let w = create(&pool, &fields("电动轮椅豪华版", 200.0, 3)).await.unwrap();

        assert_eq!(w.status, WheelchairStatus::Active);
        assert_eq!(w.stock, 3);
        assert!(w.is_available());

        let found = find_by_id(&pool, w.id).await.unwrap().unwrap();
        assert_eq!(found.name, "电动轮椅豪华版");
        assert_eq!(found.price, 200.0);
    }

    #[tokio::test]
    async fn test_search_keyword_sort_and_visibility() {
        let pool = test_pool().await;
        let a = create(&pool, &fields("手动轮椅", 50.0, 1)).await.unwrap();
        let mut b_fields = fields("电动轮椅", 300.0, 2);
        b_fields.manufacturer = Some("鱼跃医疗".to_string());
        let b = create(&pool, &b_fields).await.unwrap();
        let c = create(&pool, &fields("助行器", 80.0, 5)).await.unwrap();
        let d = create(&pool, &fields("折叠轮椅", 120.0, 1)).await.unwrap();

        set_status(&pool, c.id, WheelchairStatus::Offline).await.unwrap();
        set_status(&pool, d.id, WheelchairStatus::Deleted).await.unwrap();

        // client view: active only, newest first
        let (rows, total) = search(&pool, &WheelchairFilter::default(), Pagination::default())
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows[0].id, b.id);
        assert_eq!(rows[1].id, a.id);

        // admin view includes offline, never deleted
        let filter = WheelchairFilter {
            include_offline: true,
            sort: WheelchairSort::PriceAsc,
            ..Default::default()
        };
        let (rows, total) = search(&pool, &filter, Pagination::default()).await.unwrap();
        assert_eq!(total, 3);
        let prices: Vec<f64> = rows.iter().map(|w| w.price).collect();
        assert_eq!(prices, vec![50.0, 80.0, 300.0]);

        // keyword matches manufacturer
        let filter = WheelchairFilter {
            keyword: Some("鱼跃".to_string()),
            ..Default::default()
        };
        let (rows, total) = search(&pool, &filter, Pagination::default()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].id, b.id);
    }

    #[tokio::test]
    async fn test_search_keyword_wildcards_are_literal() {
        let pool = test_pool().await;
        create(&pool, &fields("轮椅A", 10.0, 1)).await.unwrap();
        create(&pool, &fields("100%纯铝轮椅", 10.0, 1)).await.unwrap();

        let filter = WheelchairFilter {
            keyword: Some("%".to_string()),
            ..Default::default()
        };
        let (rows, total) = search(&pool, &filter, Pagination::default()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].name, "100%纯铝轮椅");
    }

    #[tokio::test]
    async fn test_search_pagination() {
        let pool = test_pool().await;
        for i in 0..12 {
            create(&pool, &fields(&format!("轮椅{i}"), 10.0 + i as f64, 1))
                .await
                .unwrap();
        }
        let page2 = Pagination { page: 2, limit: 5 };
        let (rows, total) = search(&pool, &WheelchairFilter::default(), page2).await.unwrap();
        assert_eq!(total, 12);
        assert_eq!(rows.len(), 5);
        assert_eq!(page2.pages(total), 3);

        let page3 = Pagination { page: 3, limit: 5 };
        let (rows, _) = search(&pool, &WheelchairFilter::default(), page3).await.unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_update_skips_deleted() {
        let pool = test_pool().await;
        let w = create(&pool, &fields("手动轮椅", 50.0, 1)).await.unwrap();

        let updated = update(&pool, w.id, &fields("手动轮椅二代", 60.0, 4)).await.unwrap();
        assert_eq!(updated.name, "手动轮椅二代");
        assert_eq!(updated.stock, 4);

        set_status(&pool, w.id, WheelchairStatus::Deleted).await.unwrap();
        let err = update(&pool, w.id, &fields("x", 1.0, 1)).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
        // deleted is terminal
        assert!(!set_status(&pool, w.id, WheelchairStatus::Active).await.unwrap());
    }

    #[tokio::test]
    async fn test_batch_set_status() {
        let pool = test_pool().await;
        let a = create(&pool, &fields("A", 1.0, 1)).await.unwrap();
        let b = create(&pool, &fields("B", 1.0, 1)).await.unwrap();
        let c = create(&pool, &fields("C", 1.0, 1)).await.unwrap();
        set_status(&pool, c.id, WheelchairStatus::Deleted).await.unwrap();

        let changed = batch_set_status(&pool, &[b.id, a.id, c.id, 999], WheelchairStatus::Offline)
            .await
            .unwrap();
        assert_eq!(changed, vec![a.id, b.id]);
        assert_eq!(
            find_by_id(&pool, c.id).await.unwrap().unwrap().status,
            WheelchairStatus::Deleted
        );
        assert!(batch_set_status(&pool, &[], WheelchairStatus::Active).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_guarded_decrement() {
        let pool = test_pool().await;
        let w = create(&pool, &fields("A", 1.0, 1)).await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        assert!(decrement_stock(&mut tx, w.id).await.unwrap());
        assert!(!decrement_stock(&mut tx, w.id).await.unwrap());
        tx.commit().await.unwrap();
        assert_eq!(find_by_id(&pool, w.id).await.unwrap().unwrap().stock, 0);

        let mut tx = pool.begin().await.unwrap();
        assert!(increment_stock(&mut tx, w.id).await.unwrap());
        tx.commit().await.unwrap();

        set_status(&pool, w.id, WheelchairStatus::Offline).await.unwrap();
        let mut tx = pool.begin().await.unwrap();
        assert!(!decrement_stock(&mut tx, w.id).await.unwrap());
        tx.rollback().await.unwrap();
    }
}
