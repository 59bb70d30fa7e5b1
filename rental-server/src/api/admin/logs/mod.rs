//! Operation log routes (operator+)

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().nest(
        "/log",
        Router::new()
            .route("/list", get(handler::list))
            .route("/stats", get(handler::stats)),
    )
}
