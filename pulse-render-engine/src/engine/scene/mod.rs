//! Scene entities that present the pulse field.
//!
//! Grid cells, pulse lines and their colours. Nothing here feeds back into
//! the pulse core.

/// Hex colour conversion and cell colour selection.
pub mod colors;

/// Grid cell disc spawning and per-frame material sync.
pub mod grid;

/// Pulse line meshes and the draw-window index buffers.
pub mod lines;
