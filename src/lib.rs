pub mod app;
pub mod config;
pub mod error;
pub mod fractal;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod persistence;
pub mod render;

pub use config::Config;
pub use error::{OctaflakeError, Result};
pub use fractal::Fractal;
