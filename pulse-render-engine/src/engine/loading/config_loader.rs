use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::path::CONFIG_PATH;

use crate::engine::assets::point_cloud_assets::PointCloudAssets;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::pulse::config::PulseConfig;

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<PulseConfig>>,
}

// Start the loading process
pub fn start_loading(mut config_loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    info!("Loading pulse configuration from {}", CONFIG_PATH);
    config_loader.handle = Some(asset_server.load(CONFIG_PATH));
}

/// Settles on the configuration once the JSON asset has loaded or failed,
/// then starts loading the point cloud it names.
pub fn resolve_config_system(
    mut loading_progress: ResMut<LoadingProgress>,
    config_loader: Res<ConfigLoader>,
    mut assets: ResMut<PointCloudAssets>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<PulseConfig>>,
) {
    if loading_progress.config_resolved {
        return;
    }
    let Some(ref handle) = config_loader.handle else {
        return;
    };

    let config = if let Some(loaded) = configs.get(handle) {
        accept_config(loaded)
    } else if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle) {
        warn!("Could not load {} ({}), using defaults", CONFIG_PATH, err);
        PulseConfig::default()
    } else {
        return;
    };

    info!(
        "✓ Configuration resolved: {}ms cycle, line probability {}, seed {:?}",
        config.timing.total_ms, config.connections.line_probability, config.seed
    );
    assets.feed = asset_server.load(config.point_cloud_path.clone());
    commands.insert_resource(config);
    loading_progress.config_resolved = true;
}

/// Keeps a loaded configuration only if it validates.
pub fn accept_config(loaded: &PulseConfig) -> PulseConfig {
    match loaded.validate() {
        Ok(()) => loaded.clone(),
        Err(err) => {
            warn!("Rejected {}: {}. Using defaults", CONFIG_PATH, err);
            PulseConfig::default()
        }
    }
}
