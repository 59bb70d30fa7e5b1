//! Admin User Repository

use super::{RepoError, RepoResult};
use shared::models::{AdminUser, Pagination, Role};
use sqlx::SqlitePool;

const ADMIN_USER_SELECT: &str =
    "SELECT id, username, password_hash, role, is_deleted, create_time FROM admin_user";

/// Find a non-deleted user by username (login)
pub async fn find_live_by_username(
    pool: &SqlitePool,
    username: &str,
) -> RepoResult<Option<AdminUser>> {
    let sql = format!("{ADMIN_USER_SELECT} WHERE username = ? AND is_deleted = 0");
    let row = sqlx::query_as::<_, AdminUser>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Find a non-deleted user by id (token subject resolution)
pub async fn find_live_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<AdminUser>> {
    let sql = format!("{ADMIN_USER_SELECT} WHERE id = ? AND is_deleted = 0");
    let row = sqlx::query_as::<_, AdminUser>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Is `username` held by a live user other than `exclude_id`?
pub async fn username_taken(
    pool: &SqlitePool,
    username: &str,
    exclude_id: Option<i64>,
) -> RepoResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM admin_user WHERE username = ?1 AND is_deleted = 0 AND id != COALESCE(?2, -1)",
    )
    .bind(username)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn count_live_admins(pool: &SqlitePool) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM admin_user WHERE role = ? AND is_deleted = 0")
            .bind(Role::Admin)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    role: Role,
) -> RepoResult<AdminUser> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO admin_user (username, password_hash, role, is_deleted, create_time) VALUES (?1, ?2, ?3, 0, ?4) RETURNING id",
    )
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create admin user".into()))
}

/// Update username/role, and the password hash when given
///
/// Refuses to demote the last live admin (`Validation`); the count is checked in
/// the UPDATE itself.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    username: &str,
    role: Role,
    password_hash: Option<&str>,
) -> RepoResult<AdminUser> {
    let rows = sqlx::query(
        "UPDATE admin_user SET username = ?1, role = ?2, password_hash = COALESCE(?3, password_hash) \
         WHERE id = ?4 AND is_deleted = 0 \
         AND (?2 = ?5 OR role != ?5 \
              OR (SELECT COUNT(*) FROM admin_user WHERE role = ?5 AND is_deleted = 0) > 1)",
    )
    .bind(username)
    .bind(role)
    .bind(password_hash)
    .bind(id)
    .bind(Role::Admin)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return match find_live_by_id(pool, id).await? {
            Some(_) => Err(RepoError::Validation(format!(
                "Admin user {id} is the last live admin"
            ))),
            None => Err(RepoError::NotFound(format!("Admin user {id} not found"))),
        };
    }

    find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Admin user {id} not found")))
}

/// Promote a live user to admin (bootstrap recovery)
pub async fn promote_to_admin(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE admin_user SET role = ? WHERE id = ? AND is_deleted = 0")
        .bind(Role::Admin)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn update_password(pool: &SqlitePool, id: i64, password_hash: &str) -> RepoResult<bool> {
    let rows =
        sqlx::query("UPDATE admin_user SET password_hash = ? WHERE id = ? AND is_deleted = 0")
            .bind(password_hash)
            .bind(id)
            .execute(pool)
            .await?;
    Ok(rows.rows_affected() > 0)
}

/// Soft delete; the username becomes free for reuse
pub async fn soft_delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("UPDATE admin_user SET is_deleted = 1 WHERE id = ? AND is_deleted = 0")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Live users, newest first, optionally filtered by role
pub async fn list(
    pool: &SqlitePool,
    role: Option<Role>,
    pagination: Pagination,
) -> RepoResult<(Vec<AdminUser>, i64)> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM admin_user WHERE is_deleted = 0 AND (?1 IS NULL OR role = ?1)",
    )
    .bind(role)
    .fetch_one(pool)
    .await?;

    let sql = format!(
        "{ADMIN_USER_SELECT} WHERE is_deleted = 0 AND (?1 IS NULL OR role = ?1) ORDER BY id DESC LIMIT ?2 OFFSET ?3"
    );
    let rows = sqlx::query_as::<_, AdminUser>(&sql)
        .bind(role)
        .bind(pagination.limit as i64)
        .bind(pagination.offset())
        .fetch_all(pool)
        .await?;

    Ok((rows, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_create_and_find_live() {
        let pool = test_pool().await;
        let user = create(&pool, "op1", "hash", Role::Operator).await.unwrap();
        assert_eq!(user.role, Role::Operator);
        assert!(!user.is_deleted);

        let found = find_live_by_username(&pool, "op1").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(find_live_by_username(&pool, "nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_username_unique_among_live_only() {
        let pool = test_pool().await;
        let first = create(&pool, "alice", "h1", Role::Operator).await.unwrap();

        let dup = create(&pool, "alice", "h2", Role::Operator).await.unwrap_err();
        assert!(matches!(dup, RepoError::Duplicate(_)));
        assert!(username_taken(&pool, "alice", None).await.unwrap());
        assert!(!username_taken(&pool, "alice", Some(first.id)).await.unwrap());

        assert!(soft_delete(&pool, first.id).await.unwrap());
        assert!(!soft_delete(&pool, first.id).await.unwrap());
        assert!(find_live_by_id(&pool, first.id).await.unwrap().is_none());

        // name is free again after soft delete
        let second = create(&pool, "alice", "h3", Role::Admin).await.unwrap();
        assert_ne!(second.id, first.id);
    }

    #[tokio::test]
    async fn test_update_keeps_password_when_absent() {
        let pool = test_pool().await;
        let user = create(&pool, "bob", "old-hash", Role::Operator).await.unwrap();

        let updated = update(&pool, user.id, "bobby", Role::Admin, None).await.unwrap();
        assert_eq!(updated.username, "bobby");
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.password_hash, "old-hash");

        let updated = update(&pool, user.id, "bobby", Role::Admin, Some("new-hash"))
            .await
            .unwrap();
        assert_eq!(updated.password_hash, "new-hash");

        let err = update(&pool, 999, "x", Role::Admin, None).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_refuses_to_demote_last_admin() {
        let pool = test_pool().await;
        let a1 = create(&pool, "a1", "h", Role::Admin).await.unwrap();

        let err = update(&pool, a1.id, "a1", Role::Operator, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert_eq!(find_live_by_id(&pool, a1.id).await.unwrap().unwrap().role, Role::Admin);

        // renaming the last admin is still fine
        let renamed = update(&pool, a1.id, "root", Role::Admin, None).await.unwrap();
        assert_eq!(renamed.username, "root");

        let a2 = create(&pool, "a2", "h", Role::Admin).await.unwrap();
        let demoted = update(&pool, a1.id, "root", Role::Operator, None).await.unwrap();
        assert_eq!(demoted.role, Role::Operator);
        let err = update(&pool, a2.id, "a2", Role::Operator, None).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
        assert_eq!(count_live_admins(&pool).await.unwrap(), 1);

        assert!(promote_to_admin(&pool, a1.id).await.unwrap());
        assert_eq!(count_live_admins(&pool).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_and_count_admins() {
        let pool = test_pool().await;
        create(&pool, "a1", "h", Role::Admin).await.unwrap();
        create(&pool, "o1", "h", Role::Operator).await.unwrap();
        let o2 = create(&pool, "o2", "h", Role::Operator).await.unwrap();
        soft_delete(&pool, o2.id).await.unwrap();

        assert_eq!(count_live_admins(&pool).await.unwrap(), 1);

        let (rows, total) = list(&pool, None, Pagination::default()).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows.len(), 2);

        let (rows, total) = list(&pool, Some(Role::Operator), Pagination::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].username, "o1");
    }
}
