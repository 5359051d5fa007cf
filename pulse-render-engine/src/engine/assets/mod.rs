//! Asset data for the point cloud feed.
//!
//! Holds the vertex records handed over by the loader, the resource tracking
//! their handles, and the bounds helper shared with clustering.

/// Axis-aligned bounds tracking for clusters and camera framing.
pub mod bounds;

/// Vertex records, the loaded feed asset and its handle resource.
pub mod point_cloud_assets;
