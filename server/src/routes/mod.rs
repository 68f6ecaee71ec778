//! HTTP surface: route table and middleware.

pub mod boards;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    Router::new()
        .route("/boards", get(boards::list_boards).post(boards::create_board))
        .route(
            "/boards/{id}",
            get(boards::get_board).put(boards::update_board).delete(boards::delete_board),
        )
        .route("/boards/{id}/events", get(boards::board_events))
        .route("/boards/{id}/cursor", post(boards::move_cursor))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
