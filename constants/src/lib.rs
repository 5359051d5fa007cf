//! Default values for every tunable of the pulse field.
//!
//! These are the compile-time defaults; the render engine can override them
//! from a JSON config at startup, after which they are frozen.

pub mod connection;
pub mod grid;
pub mod path;
pub mod render_settings;
pub mod scheduling;
pub mod timing;
