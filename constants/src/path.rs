/// Pulse configuration, relative to the asset root.
pub const CONFIG_PATH: &str = "pulse_config.json";

/// Default ASCII PLY point cloud, relative to the asset root.
pub const POINT_CLOUD_PATH: &str = "pointcloud/cloud.ply";
