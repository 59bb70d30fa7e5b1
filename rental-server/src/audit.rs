//! 操作日志
//!
//! 每个后台写操作追加一条 `operation_log`。写入失败只记录到 tracing，
//! 不影响被审计的操作本身。

use shared::models::OperateType;
use sqlx::SqlitePool;

use crate::auth::CurrentUser;
use crate::db::repository::operation_log;

/// 追加一条操作日志 (失败不返回错误)
pub async fn record(
    pool: &SqlitePool,
    operator: &CurrentUser,
    operate_type: OperateType,
    target_id: Option<i64>,
) {
    if let Err(e) = operation_log::insert(pool, operator.id, operate_type, target_id).await {
        tracing::error!(
            operator_id = operator.id,
            operator = %operator.username,
            operate_type = operate_type.as_str(),
            target_id = ?target_id,
            error = %e,
            "Failed to write operation log"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{admin_user, operation_log::LogFilter};
    use crate::db::test_pool;
    use shared::models::{Pagination, Role};

    #[tokio::test]
    async fn test_record_appends() {
        let pool = test_pool().await;
        let user = admin_user::create(&pool, "admin", "h", Role::Admin).await.unwrap();
        let operator = CurrentUser::from(&user);

        record(&pool, &operator, OperateType::Logout, None).await;

        let (rows, total) = operation_log::list(&pool, &LogFilter::default(), Pagination::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].operate_type, OperateType::Logout);
    }

    #[tokio::test]
    async fn test_record_failure_is_swallowed() {
        let pool = test_pool().await;
        // operator 999 violates the foreign key; the call still returns normally
        let ghost = CurrentUser {
            id: 999,
            username: "ghost".into(),
            role: Role::Admin,
        };
        record(&pool, &ghost, OperateType::Login, None).await;

        let (_, total) = operation_log::list(&pool, &LogFilter::default(), Pagination::default())
            .await
            .unwrap();
        assert_eq!(total, 0);
    }
}
