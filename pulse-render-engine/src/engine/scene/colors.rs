use bevy::prelude::*;

use crate::engine::pulse::config::VisualConfig;
use crate::engine::pulse::grid_model::CellVisual;

/// `0xRRGGBB` to an sRGB colour. Bits above the low 24 are ignored.
pub fn hex_color(hex: u32) -> Color {
    let [_, r, g, b] = hex.to_be_bytes();
    Color::srgb_u8(r, g, b)
}

pub fn cell_color(visual: CellVisual, visuals: &VisualConfig) -> Color {
    match visual {
        CellVisual::Default => hex_color(visuals.cell_default_color),
        CellVisual::Highlighted => hex_color(visuals.cell_highlight_color),
    }
}
