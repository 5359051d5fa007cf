//! Startup pipeline: configuration, vertex feed, grids and pulse field.
//!
//! Each stage records completion in [`progress::LoadingProgress`]; the state
//! transitions in `core::app_state` watch those flags.

/// Pulse configuration loading with validation and default fallback.
///
/// Starts the point cloud load once the configuration names its path.
pub mod config_loader;

/// Load-state monitoring for the point cloud feed.
pub mod feed_loader;

/// ASCII PLY parsing and the `.ply` asset loader.
pub mod ply_loader;

/// Pulse field construction, point cloud spawning and camera framing.
pub mod point_cloud_creator;

/// Loading progress tracking resource for state transitions.
pub mod progress;
