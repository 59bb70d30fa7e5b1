//! 后台管理 API
//!
//! 除 `/api/admin/login` 外所有路由都需要 Bearer 令牌。
//!
//! | 分组 | 角色 |
//! |------|------|
//! | logout / profile / change-password | 任意已登录账号 |
//! | inventory / order / log | 操作员及以上 |
//! | user | 仅管理员 |

mod auth;
mod inventory;
mod logs;
mod orders;
mod users;

use axum::{Router, middleware};

use crate::auth::{ADMIN_ONLY, STAFF, require_auth, require_role};
use crate::state::AppState;

/// Admin router
///
/// `require_auth` 在最外层，先于各分组的角色检查执行。
pub fn router(state: &AppState) -> Router<AppState> {
    let staff_routes = Router::new()
        .merge(inventory::routes())
        .merge(orders::routes())
        .merge(logs::routes())
        .route_layer(middleware::from_fn(require_role(STAFF)));

    let admin_routes = users::routes().route_layer(middleware::from_fn(require_role(ADMIN_ONLY)));

    let protected = Router::new()
        .merge(auth::session_routes())
        .merge(staff_routes)
        .merge(admin_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new().nest("/api/admin", auth::public_routes().merge(protected))
}
