// build.rs
use std::{env, fs, path::PathBuf};

use constants::{connection, grid, path, render_settings, scheduling, timing};

/// Writes a default pulse configuration into `assets/` unless one exists, so
/// a fresh checkout runs with every tunable visible and editable.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let assets_dir = manifest_dir.join("assets");
    fs::create_dir_all(&assets_dir).ok();

    let config_path = assets_dir.join(path::CONFIG_PATH);
    println!("cargo:rerun-if-changed={}", config_path.display());
    if config_path.exists() {
        return;
    }

    let default_config = serde_json::json!({
        "timing": {
            "total_ms": timing::TOTAL_CYCLE_MS,
            "phase_ms": timing::PHASE_MS,
            "fade_window_secs": timing::FADE_WINDOW_SECS,
        },
        "connections": {
            "line_probability": connection::LINE_PROBABILITY,
            "sag_amount": connection::SAG_AMOUNT,
            "curve_segments": connection::CURVE_SEGMENTS,
        },
        "grid": {
            "grid_size": grid::GRID_SIZE,
            "sub_cluster_size": grid::SUB_CLUSTER_SIZE,
            "cell_spacing": grid::CELL_SPACING,
            "extra_gap": grid::EXTRA_GAP,
            "depth_jitter_range": grid::DEPTH_JITTER_RANGE,
            "plane_jitter_fraction": grid::PLANE_JITTER_FRACTION,
            "grid_a_depth": grid::GRID_A_DEPTH,
            "grid_b_depth": grid::GRID_B_DEPTH,
        },
        "scheduling": {
            "min_delay_ms": scheduling::SPAWN_DELAY_MIN_MS,
            "max_delay_ms": scheduling::SPAWN_DELAY_MAX_MS,
        },
        "visuals": {
            "cell_default_color": render_settings::CELL_DEFAULT_COLOR,
            "cell_highlight_color": render_settings::CELL_HIGHLIGHT_COLOR,
            "line_color": render_settings::LINE_COLOR,
        },
        "seed": null,
        "point_cloud_path": path::POINT_CLOUD_PATH,
    });

    let json_content = serde_json::to_string_pretty(&default_config).unwrap();
    fs::write(&config_path, &json_content).expect("Failed to write default pulse config to assets");

    println!("cargo:warning=Generated default config in assets/{}", path::CONFIG_PATH);
}
