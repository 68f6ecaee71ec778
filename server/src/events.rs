//! Per-board event fan-out.
//!
//! DESIGN
//! ======
//! Every board gets its own `tokio::sync::broadcast` channel, created lazily
//! on first subscribe or publish. Board mutations and cursor broadcasts are
//! published as [`BoardEvent`]s; SSE handlers subscribe and forward. The
//! broadcast channel drops the oldest events for subscribers that fall
//! behind — the SSE stream logs and skips rather than disconnecting them.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

/// Capacity of each per-board channel; slow subscribers lose oldest events.
const CHANNEL_CAPACITY: usize = 32;

/// One push event on a board's stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardEvent {
    /// Event name: `board.created`, `board.updated`, `board.deleted`,
    /// `cursor.moved`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "boardId")]
    pub board_id: Uuid,
    pub data: serde_json::Value,
}

impl BoardEvent {
    #[must_use]
    pub fn new(kind: &str, board_id: Uuid, data: serde_json::Value) -> Self {
        Self { kind: kind.to_owned(), board_id, data }
    }
}

/// Lazily created broadcast channels, one per board.
#[derive(Clone, Default)]
pub struct EventHub {
    channels: Arc<RwLock<HashMap<Uuid, broadcast::Sender<BoardEvent>>>>,
}

impl EventHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a board's stream, creating the channel if needed.
    pub async fn subscribe(&self, board_id: Uuid) -> broadcast::Receiver<BoardEvent> {
        let mut channels = self.channels.write().await;
        channels
            .entry(board_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish an event to a board's subscribers. A board nobody watches is
    /// not an error.
    pub async fn publish(&self, event: BoardEvent) {
        let channels = self.channels.read().await;
        let Some(sender) = channels.get(&event.board_id) else {
            return;
        };
        if sender.send(event).is_err() {
            tracing::debug!("event published with no live subscribers");
        }
    }

    /// Drop a deleted board's channel, disconnecting its subscribers.
    pub async fn remove(&self, board_id: Uuid) {
        self.channels.write().await.remove(&board_id);
    }
}
