//! Application state

use std::sync::Arc;

use shared::models::Role;
use sqlx::SqlitePool;

use crate::auth::{JwtConfig, JwtService, hash_password};
use crate::config::Config;
use crate::db::DbService;
use crate::db::repository::admin_user;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// Admin token service
    pub jwt: Arc<JwtService>,
    /// Loaded configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the database, apply migrations and seed the bootstrap admin
    pub async fn new(config: Config) -> Result<Self, BoxError> {
        let db = DbService::new(&config.database_url).await?;
        let state = Self::with_pool(db.pool, config);
        state.ensure_bootstrap_admin().await?;
        Ok(state)
    }

    /// Build state around an existing pool
    pub fn with_pool(pool: SqlitePool, config: Config) -> Self {
        let jwt = JwtService::with_config(JwtConfig::new(
            config.jwt_secret.clone(),
            config.jwt_expiry_hours,
        ));
        Self {
            pool,
            jwt: Arc::new(jwt),
            config: Arc::new(config),
        }
    }

    /// Create the configured admin account when no live admin exists
    ///
    /// If the bootstrap username is still held by a live (demoted) account,
    /// that account is promoted back to admin instead.
    pub async fn ensure_bootstrap_admin(&self) -> Result<(), BoxError> {
        if admin_user::count_live_admins(&self.pool).await? > 0 {
            return Ok(());
        }

        let username = &self.config.bootstrap_admin_username;
        if let Some(existing) = admin_user::find_live_by_username(&self.pool, username).await? {
            admin_user::promote_to_admin(&self.pool, existing.id).await?;
            tracing::warn!(
                user_id = existing.id,
                username = %existing.username,
                "No admin account found, promoted existing bootstrap user back to admin"
            );
            return Ok(());
        }

        let hash = hash_password(&self.config.bootstrap_admin_password)
            .map_err(|e| format!("Failed to hash bootstrap password: {e}"))?;
        let user = admin_user::create(&self.pool, username, &hash, Role::Admin).await?;

        tracing::warn!(
            user_id = user.id,
            username = %user.username,
            "No admin account found, created bootstrap admin; change its password after first login"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_bootstrap_admin_created_once() {
        let state = AppState::with_pool(test_pool().await, Config::default());

        state.ensure_bootstrap_admin().await.unwrap();
        state.ensure_bootstrap_admin().await.unwrap();

        assert_eq!(admin_user::count_live_admins(&state.pool).await.unwrap(), 1);
        let admin = admin_user::find_live_by_username(&state.pool, "admin")
            .await
            .unwrap()
            .unwrap();
        assert!(crate::auth::verify_password("admin123", &admin.password_hash));
    }

    #[tokio::test]
    async fn test_bootstrap_promotes_demoted_user() {
        let state = AppState::with_pool(test_pool().await, Config::default());
        let user = admin_user::create(&state.pool, "admin", "old-hash", Role::Operator)
            .await
            .unwrap();
        assert_eq!(admin_user::count_live_admins(&state.pool).await.unwrap(), 0);

        state.ensure_bootstrap_admin().await.unwrap();

        let admin = admin_user::find_live_by_id(&state.pool, user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.password_hash, "old-hash");
        assert_eq!(admin_user::count_live_admins(&state.pool).await.unwrap(), 1);
    }
}
