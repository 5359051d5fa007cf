pub mod assets;
pub mod core;
pub mod loading;
pub mod pulse;
pub mod scene;
pub mod systems;
