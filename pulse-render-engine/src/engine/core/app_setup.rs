use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::render_settings::BACKGROUND_COLOR;

use crate::engine::assets::point_cloud_assets::{PointCloudAssets, PointCloudFeed};
use crate::engine::core::app_state::{AppState, transition_to_assets_loaded, transition_to_running};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::config_loader::{ConfigLoader, resolve_config_system, start_loading};
use crate::engine::loading::feed_loader::check_feed_loading;
use crate::engine::loading::ply_loader::PlyFeedLoader;
use crate::engine::loading::point_cloud_creator::create_point_cloud_when_ready;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::pulse::config::PulseConfig;
use crate::engine::scene::colors::hex_color;
use crate::engine::scene::grid::create_grids_when_configured;
use crate::engine::systems::pulse::PulsePlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers PulseConfig as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<PulseConfig>::new(&["json"]))
        .init_asset::<PointCloudFeed>()
        .init_asset_loader::<PlyFeedLoader>()
        .add_plugins(PulsePlugin)
        .insert_resource(ClearColor(hex_color(BACKGROUND_COLOR)));

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ConfigLoader>()
        .init_resource::<PointCloudAssets>();

    // State-based system scheduling
    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (
                // Loading phase systems
                resolve_config_system,
                create_grids_when_configured,
                check_feed_loading,
                create_point_cloud_when_ready,
                transition_to_assets_loaded,
            )
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            Update,
            transition_to_running.run_if(in_state(AppState::AssetsLoaded)),
        );

    app
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    // Reframed once the cloud and grids exist.
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 0.0, 1.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
