//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the board store (in-memory map plus JSON-file persistence) and the
//! per-board event hub that fans board mutations and cursor broadcasts out to
//! SSE subscribers.

use std::sync::Arc;

use crate::events::EventHub;
use crate::store::BoardStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BoardStore>,
    pub events: EventHub,
}

impl AppState {
    #[must_use]
    pub fn new(store: BoardStore) -> Self {
        Self { store: Arc::new(store), events: EventHub::new() }
    }
}
