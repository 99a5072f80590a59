pub mod renderer;
pub mod sim;
pub mod wad;
pub mod world;
