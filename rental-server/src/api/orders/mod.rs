//! 客户端订单接口
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/order/precreate | POST | 创建预订单 (保留 30 分钟) |
//! | /api/order/submit | POST | 预订单转正式订单 |
//! | /api/order/detail/{order_no} | GET | 按订单号查询 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/order", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/precreate", post(handler::precreate))
        .route("/submit", post(handler::submit))
        .route("/detail/{order_no}", get(handler::detail))
}
