//! Admin account routes (admin only)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().nest(
        "/user",
        Router::new()
            .route("/list", get(handler::list))
            .route("/save", post(handler::save))
            .route("/delete", post(handler::delete)),
    )
}
