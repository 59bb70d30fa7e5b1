//! Admin order routes (operator+)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().nest(
        "/order",
        Router::new()
            .route("/list", get(handler::list))
            .route("/detail/{id}", get(handler::detail))
            .route("/update/status", post(handler::update_status))
            .route("/cleanup-temp", post(handler::cleanup_temp)),
    )
}
