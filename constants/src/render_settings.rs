/// Grid cell colour while idle.
pub const CELL_DEFAULT_COLOR: u32 = 0x1a1a1a;

/// Grid cell colour while an instance highlights it.
pub const CELL_HIGHLIGHT_COLOR: u32 = 0xffffff;

/// Colour of the travelling line segment.
pub const LINE_COLOR: u32 = 0xf8f8f8;

/// Scene clear colour.
pub const BACKGROUND_COLOR: u32 = 0x000000;

/// Disc segments used for each grid cell mesh.
pub const CELL_RESOLUTION: u32 = 32;

/// Grid cell disc radius as a fraction of the cell spacing.
pub const CELL_RADIUS_FRACTION: f32 = 0.4;

/// Extra room left around the framed scene.
pub const CAMERA_MARGIN: f32 = 1.25;
