/// Lower bound (inclusive) of the delay between pulse spawns, in milliseconds.
pub const SPAWN_DELAY_MIN_MS: u64 = 300;

/// Upper bound (exclusive) of the delay between pulse spawns, in milliseconds.
pub const SPAWN_DELAY_MAX_MS: u64 = 700;
