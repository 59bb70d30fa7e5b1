//! Operation Log Repository

use super::RepoResult;
use shared::models::{
    OperateType, OperateTypeCount, OperationLog, OperationLogStats, OperatorCount, Pagination,
};
use sqlx::SqlitePool;

const LOG_SELECT: &str = "SELECT l.id, l.operator_id, u.username AS operator_name, u.role AS operator_role, l.operate_type, l.target_id, l.operate_time FROM operation_log l LEFT JOIN admin_user u ON l.operator_id = u.id";

/// Shared filter, bound as ?1..?4
const LOG_WHERE: &str = "WHERE (?1 IS NULL OR l.operator_id = ?1) AND (?2 IS NULL OR l.operate_type = ?2) AND (?3 IS NULL OR l.operate_time >= ?3) AND (?4 IS NULL OR l.operate_time <= ?4)";

/// Log query filter (all optional)
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub operator_id: Option<i64>,
    pub operate_type: Option<OperateType>,
    /// Inclusive lower bound, Unix millis
    pub start_time: Option<i64>,
    /// Inclusive upper bound, Unix millis
    pub end_time: Option<i64>,
}

pub async fn insert(
    pool: &SqlitePool,
    operator_id: i64,
    operate_type: OperateType,
    target_id: Option<i64>,
) -> RepoResult<i64> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO operation_log (operator_id, operate_type, target_id, operate_time) VALUES (?1, ?2, ?3, ?4) RETURNING id",
    )
    .bind(operator_id)
    .bind(operate_type)
    .bind(target_id)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Newest-first page of log entries
pub async fn list(
    pool: &SqlitePool,
    filter: &LogFilter,
    pagination: Pagination,
) -> RepoResult<(Vec<OperationLog>, i64)> {
    let total = count(pool, filter).await?;

    let sql = format!("{LOG_SELECT} {LOG_WHERE} ORDER BY l.id DESC LIMIT ?5 OFFSET ?6");
    let rows = sqlx::query_as::<_, OperationLog>(&sql)
        .bind(filter.operator_id)
        .bind(filter.operate_type)
        .bind(filter.start_time)
        .bind(filter.end_time)
        .bind(pagination.limit as i64)
        .bind(pagination.offset())
        .fetch_all(pool)
        .await?;

    Ok((rows, total))
}

async fn count(pool: &SqlitePool, filter: &LogFilter) -> RepoResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM operation_log l {LOG_WHERE}");
    let total: i64 = sqlx::query_scalar(&sql)
        .bind(filter.operator_id)
        .bind(filter.operate_type)
        .bind(filter.start_time)
        .bind(filter.end_time)
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// Totals per operation type and per operator
pub async fn stats(pool: &SqlitePool, filter: &LogFilter) -> RepoResult<OperationLogStats> {
    let total = count(pool, filter).await?;

    let by_type_sql = format!(
        "SELECT l.operate_type, COUNT(*) AS count FROM operation_log l {LOG_WHERE} GROUP BY l.operate_type ORDER BY count DESC, l.operate_type"
    );
    let by_type = sqlx::query_as::<_, OperateTypeCount>(&by_type_sql)
        .bind(filter.operator_id)
        .bind(filter.operate_type)
        .bind(filter.start_time)
        .bind(filter.end_time)
        .fetch_all(pool)
        .await?;

    let by_operator_sql = format!(
        "SELECT l.operator_id, u.username AS operator_name, COUNT(*) AS count FROM operation_log l LEFT JOIN admin_user u ON l.operator_id = u.id {LOG_WHERE} GROUP BY l.operator_id ORDER BY count DESC, l.operator_id"
    );
    let by_operator = sqlx::query_as::<_, OperatorCount>(&by_operator_sql)
        .bind(filter.operator_id)
        .bind(filter.operate_type)
        .bind(filter.start_time)
        .bind(filter.end_time)
        .fetch_all(pool)
        .await?;

    Ok(OperationLogStats {
        total,
        by_type,
        by_operator,
    })
}
