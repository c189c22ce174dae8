use crate::math::{Point3, Vector3};

use super::CameraPose;

/// Horizontal orbit radius at zoom 1.
const ORBIT_RADIUS: f64 = 20.0;

/// Camera height above the XY plane at zoom 1.
const ORBIT_HEIGHT: f64 = 10.0;

/// Plans a full circular orbit around the origin.
///
/// Frame `i` sits at angle `i * 360° / frame_count` in the XY plane, at
/// horizontal distance `20 * zoom` and height `10 * zoom`, looking at the
/// origin with +Z up.
#[derive(Debug, Clone, Copy)]
pub struct Orbit {
    frame_count: usize,
    zoom: f64,
}

impl Orbit {
    /// Creates a new `Orbit` planner.
    #[must_use]
    pub fn new(frame_count: usize, zoom: f64) -> Self {
        Self { frame_count, zoom }
    }

    /// Returns the pose of frame `index`.
    ///
    /// With a frame count of zero every index maps to the starting pose.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pose(&self, index: usize) -> CameraPose {
        let angle = if self.frame_count == 0 {
            0.0
        } else {
            index as f64 * std::f64::consts::TAU / self.frame_count as f64
        };
        let (sin, cos) = angle.sin_cos();
        CameraPose {
            position: Point3::new(
                ORBIT_RADIUS * self.zoom * cos,
                ORBIT_RADIUS * self.zoom * sin,
                ORBIT_HEIGHT * self.zoom,
            ),
            target: Point3::origin(),
            up: Vector3::z(),
        }
    }

    /// Executes the planner, returning one pose per frame.
    ///
    /// A frame count of zero yields an empty path.
    #[must_use]
    pub fn execute(&self) -> Vec<CameraPose> {
        (0..self.frame_count).map(|i| self.pose(i)).collect()
    }
}
