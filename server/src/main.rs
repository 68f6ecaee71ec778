mod events;
mod routes;
mod state;
mod store;

use std::path::PathBuf;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".into())
        .parse()
        .expect("invalid PORT");
    let storage_path = std::env::var("STORAGE_PATH").unwrap_or_else(|_| "boards.json".into());

    let store = store::BoardStore::open(Some(PathBuf::from(&storage_path)))
        .await
        .expect("storage init failed");
    tracing::info!(path = %storage_path, boards = store.len().await, "storage loaded");

    let state = state::AppState::new(store);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "board server listening");
    axum::serve(listener, app).await.expect("server failed");
}
