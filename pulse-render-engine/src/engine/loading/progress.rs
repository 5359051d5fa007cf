use bevy::prelude::*;

/// Milestones of the startup pipeline, checked by the state transitions.
#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub config_resolved: bool,
    pub grids_created: bool,
    pub feed_loaded: bool,
    pub feed_failed: bool,
    pub point_cloud_created: bool,
}
