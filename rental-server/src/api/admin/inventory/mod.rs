//! Admin inventory routes (operator+)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().nest(
        "/inventory",
        Router::new()
            .route("/list", get(handler::list))
            .route("/detail/{id}", get(handler::detail))
            .route("/save", post(handler::save))
            .route("/operate", post(handler::operate)),
    )
}
