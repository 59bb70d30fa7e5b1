//! Admin session routes

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// 公共路由 (无需令牌)
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/login", post(handler::login))
}

/// 已登录账号可用
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(handler::logout))
        .route("/profile", get(handler::profile))
        .route("/change-password", post(handler::change_password))
}
