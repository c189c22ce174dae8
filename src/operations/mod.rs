pub mod camera;
pub mod coloring;
pub mod generation;
