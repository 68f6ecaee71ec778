//! Board storage: an in-memory map with JSON-file persistence.
//!
//! DESIGN
//! ======
//! All boards live in memory behind an `RwLock`; every write persists the
//! whole collection to a single JSON file. A missing or empty file at startup
//! is not an error — the store simply starts empty. Opening with no path
//! gives a purely in-memory store (used by tests).

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;
use std::path::PathBuf;

use canvas::doc::Board;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("board {0} not found")]
    NotFound(Uuid),
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistentData {
    #[serde(default)]
    boards: HashMap<Uuid, Board>,
}

pub struct BoardStore {
    path: Option<PathBuf>,
    data: RwLock<PersistentData>,
}

/// Current time as an RFC 3339 `updatedAt` stamp.
#[must_use]
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

impl BoardStore {
    /// Open the store, loading existing boards from `path` if the file is
    /// present and non-empty.
    ///
    /// # Errors
    /// Fails if the file exists but cannot be read or parsed.
    pub async fn open(path: Option<PathBuf>) -> Result<Self, StoreError> {
        let mut data = PersistentData::default();
        if let Some(path) = &path {
            match tokio::fs::read(path).await {
                Ok(raw) if !raw.is_empty() => {
                    data = serde_json::from_slice(&raw)?;
                }
                Ok(_) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(Self { path, data: RwLock::new(data) })
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.boards.len()
    }

    /// All boards, most recently updated first.
    pub async fn list(&self) -> Vec<Board> {
        let data = self.data.read().await;
        let mut boards: Vec<Board> = data.boards.values().cloned().collect();
        boards.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.name.cmp(&b.name)));
        boards
    }

    pub async fn get(&self, id: Uuid) -> Option<Board> {
        self.data.read().await.boards.get(&id).cloned()
    }

    pub async fn contains(&self, id: Uuid) -> bool {
        self.data.read().await.boards.contains_key(&id)
    }

    /// Insert a new board. A nil id gets a fresh one; a blank name gets the
    /// default. Stamps `updatedAt`.
    ///
    /// # Errors
    /// Fails if persisting to disk fails.
    pub async fn create(&self, mut board: Board) -> Result<Board, StoreError> {
        if board.id.is_nil() {
            board.id = Uuid::new_v4();
        }
        if board.name.trim().is_empty() {
            board.name = "Untitled Board".to_owned();
        }
        board.updated_at = now_rfc3339();
        let mut data = self.data.write().await;
        data.boards.insert(board.id, board.clone());
        self.persist(&data).await?;
        Ok(board)
    }

    /// Replace a board wholesale. Stamps `updatedAt`.
    ///
    /// # Errors
    /// `NotFound` if the id is unknown; otherwise persistence failures.
    pub async fn update(&self, id: Uuid, mut board: Board) -> Result<Board, StoreError> {
        let mut data = self.data.write().await;
        if !data.boards.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        board.id = id;
        if board.name.trim().is_empty() {
            board.name = "Untitled Board".to_owned();
        }
        board.updated_at = now_rfc3339();
        data.boards.insert(id, board.clone());
        self.persist(&data).await?;
        Ok(board)
    }

    /// Delete a board.
    ///
    /// # Errors
    /// `NotFound` if the id is unknown; otherwise persistence failures.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        if data.boards.remove(&id).is_none() {
            return Err(StoreError::NotFound(id));
        }
        self.persist(&data).await
    }

    async fn persist(&self, data: &PersistentData) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let raw = serde_json::to_vec_pretty(data)?;
        tokio::fs::write(path, raw).await?;
        Ok(())
    }
}
