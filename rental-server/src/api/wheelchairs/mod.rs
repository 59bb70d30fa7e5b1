//! 客户端轮椅接口
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/wheelchair/search | GET | 关键字检索 (仅在售) |
//! | /api/wheelchair/detail/{id} | GET | 轮椅详情 |

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/wheelchair", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(handler::search))
        .route("/detail/{id}", get(handler::detail))
}
