mod orbit;

pub use orbit::Orbit;

use crate::math::{Point3, Vector3};

/// Camera placement for one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position.
    pub position: Point3,
    /// Point the camera looks at.
    pub target: Point3,
    /// Up direction.
    pub up: Vector3,
}
