//! Board CRUD, the SSE event stream, and cursor presence.
//!
//! DESIGN
//! ======
//! Boards replace wholesale: PUT takes the client's full document, runs
//! status propagation over the causal graph, stamps `updatedAt`, persists,
//! and fans the result out as a `board.updated` event. Cursor broadcasts are
//! fire-and-forget: the server validates, answers `202 Accepted`, and relays
//! without storing anything.

#[cfg(test)]
#[path = "boards_test.rs"]
mod tests;

use std::convert::Infallible;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use canvas::doc::Board;
use canvas::engine::CursorState;
use canvas::status;
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::events::BoardEvent;
use crate::state::AppState;
use crate::store::{StoreError, now_rfc3339};

fn store_error_to_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Io(_) | StoreError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn event_payload<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

pub async fn list_boards(State(state): State<AppState>) -> Json<Vec<Board>> {
    Json(state.store.list().await)
}

pub async fn create_board(
    State(state): State<AppState>,
    Json(board): Json<Board>,
) -> Result<(StatusCode, Json<Board>), StatusCode> {
    let board = state.store.create(board).await.map_err(|err| {
        tracing::error!(error = %err, "create board failed");
        store_error_to_status(&err)
    })?;
    state
        .events
        .publish(BoardEvent::new("board.created", board.id, event_payload(&board)))
        .await;
    tracing::info!(board_id = %board.id, name = %board.name, "board created");
    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn get_board(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Board>, StatusCode> {
    state.store.get(id).await.map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn update_board(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut board): Json<Board>,
) -> Result<Json<Board>, StatusCode> {
    status::propagate(&mut board, &now_rfc3339());
    let board = state.store.update(id, board).await.map_err(|err| {
        if !matches!(err, StoreError::NotFound(_)) {
            tracing::error!(error = %err, board_id = %id, "update board failed");
        }
        store_error_to_status(&err)
    })?;
    state
        .events
        .publish(BoardEvent::new("board.updated", id, event_payload(&board)))
        .await;
    Ok(Json(board))
}

pub async fn delete_board(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    state.store.delete(id).await.map_err(|err| store_error_to_status(&err))?;
    state
        .events
        .publish(BoardEvent::new("board.deleted", id, serde_json::json!({ "id": id })))
        .await;
    state.events.remove(id).await;
    tracing::info!(board_id = %id, "board deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Relay a participant's cursor to everyone watching the board. Nothing is
/// stored; liveness pruning happens client-side.
pub async fn move_cursor(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(cursor): Json<CursorState>,
) -> Result<StatusCode, StatusCode> {
    if cursor.id.is_nil() {
        return Err(StatusCode::BAD_REQUEST);
    }
    if !state.store.contains(id).await {
        return Err(StatusCode::NOT_FOUND);
    }
    state
        .events
        .publish(BoardEvent::new("cursor.moved", id, event_payload(&cursor)))
        .await;
    Ok(StatusCode::ACCEPTED)
}

/// SSE stream of a board's events. Opens with a `connected` comment so
/// clients can confirm the subscription before the first real event.
pub async fn board_events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    if !state.store.contains(id).await {
        return Err(StatusCode::NOT_FOUND);
    }
    let rx = state.events.subscribe(id).await;
    let events = stream::unfold(rx, move |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let payload = serde_json::to_string(&event).unwrap_or_default();
                    return Some((Ok::<_, Infallible>(Event::default().data(payload)), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(board_id = %id, skipped, "slow SSE subscriber; events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });
    let stream = stream::once(async { Ok::<_, Infallible>(Event::default().comment("connected")) })
        .chain(events);
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
