pub mod config;
pub mod nearest;
pub mod preview;
pub mod render;
pub mod topology;
pub mod triangulate;
pub mod util;
pub mod zones;
