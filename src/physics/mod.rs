pub mod chain;
pub mod walls;
pub mod world;
