use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::assets::point_cloud_assets::PointCloudAssets;
use crate::engine::loading::progress::LoadingProgress;

// Check whether the vertex feed has finished loading
pub fn check_feed_loading(
    mut loading_progress: ResMut<LoadingProgress>,
    assets: Res<PointCloudAssets>,
    asset_server: Res<AssetServer>,
) {
    if loading_progress.feed_loaded || !loading_progress.config_resolved {
        return;
    }

    match asset_server.get_load_state(&assets.feed) {
        Some(LoadState::Loaded) => {
            info!("✓ Point cloud feed loaded");
            loading_progress.feed_loaded = true;
        }
        Some(LoadState::Failed(err)) => {
            // Carry on with an empty cloud so the grids still render.
            error!("Point cloud feed failed to load: {}", err);
            loading_progress.feed_loaded = true;
            loading_progress.feed_failed = true;
        }
        _ => {}
    }
}
