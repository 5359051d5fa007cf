//! Pulse field core: clustering, grids, link templates, fades and the
//! phased pulse scheduler.
//!
//! Nothing in here queries the ECS. Systems in `engine::systems` feed it the
//! current time and copy its state into meshes and materials.

/// Vertex clustering by rounded axis indices with bounding-box centroids.
pub mod cluster_index;

/// Serde-backed tunables with defaults from the `constants` crate.
pub mod config;

/// Quadratic link curves between cluster centroids and grid cells.
pub mod connection;

/// Configuration validation errors.
pub mod error;

/// Per-vertex fade values and the colours derived from them.
pub mod fade_field;

/// Clusters, templates and fades built from one vertex feed.
pub mod field;

/// Jittered reference grids and their cell highlight state.
pub mod grid_model;

/// A single pulse and its owned line copies.
pub mod instance;

/// Phase timeline and the two-point sliding draw window.
pub mod phase;

/// Spawn timer and per-tick advancement of every live pulse.
pub mod scheduler;
