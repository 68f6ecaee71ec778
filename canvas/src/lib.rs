//! Diagram editing and layout engine for the collaborative causal board.
//!
//! This crate owns the full editing lifecycle of a board: translating raw
//! pointer/wheel/key events into document mutations, maintaining camera state
//! for pan/zoom, hit-testing entities, resolving connector anchors, moving and
//! resizing selections, and computing the deterministic causal-graph layout.
//! It performs no I/O and no drawing; a host shell feeds it events and acts on
//! the [`engine::Action`]s it returns (repaint, persist, open an editor).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Board document model: entities, bounds, cascade delete |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`anchor`] | Connector anchors: resolution and snapping |
//! | [`input`] | Tools and the gesture state machine |
//! | [`hit`] | Hit-testing against board entities |
//! | [`selection`] | Multi-entity move/resize and marquee collection |
//! | [`layout`] | Deterministic causal-graph auto-layout |
//! | [`status`] | Causal status propagation along links |
//! | [`template`] | Board templates and instantiation |
//! | [`consts`] | Shared numeric constants (zoom limits, tolerances, etc.) |

pub mod anchor;
pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod layout;
pub mod selection;
pub mod status;
pub mod template;
