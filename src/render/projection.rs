use nalgebra::{Isometry3, Perspective3, Vector4};

use crate::math::{Matrix4, Point3};
use crate::operations::camera::CameraPose;

/// Near clipping distance.
const Z_NEAR: f64 = 0.1;

/// Far clipping distance.
const Z_FAR: f64 = 1000.0;

/// A point projected into pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// Horizontal pixel coordinate, growing to the right.
    pub x: f64,
    /// Vertical pixel coordinate, growing downwards.
    pub y: f64,
    /// Distance from the eye along the view direction.
    pub depth: f64,
}

/// Perspective camera mapping world points to pixels.
#[derive(Debug, Clone)]
pub struct Projection {
    view: Matrix4,
    projection: Matrix4,
    width: f64,
    height: f64,
}

impl Projection {
    /// Builds a right-handed look-at camera for `pose`.
    ///
    /// `fov_y` is the vertical field of view in radians.
    #[must_use]
    pub fn new(pose: &CameraPose, width: u32, height: u32, fov_y: f64) -> Self {
        let width = f64::from(width);
        let height = f64::from(height);
        let view = Isometry3::look_at_rh(&pose.position, &pose.target, &pose.up).to_homogeneous();
        let projection = Perspective3::new(width / height, fov_y, Z_NEAR, Z_FAR).to_homogeneous();
        Self {
            view,
            projection,
            width,
            height,
        }
    }

    /// Projects `point`, returning `None` if it lies outside the view frustum.
    #[must_use]
    pub fn project(&self, point: &Point3) -> Option<ScreenPoint> {
        let eye = self.view * point.to_homogeneous();
        if !(Z_NEAR..=Z_FAR).contains(&-eye.z) {
            return None;
        }
        let p = self.to_screen(&eye);
        let inside = (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y);
        inside.then_some(p)
    }

    /// Projects the segment `a`-`b`, cut at the near plane.
    ///
    /// Returns `None` only when the whole segment is behind the near plane.
    /// The endpoints may land outside the image.
    #[must_use]
    pub fn project_segment(&self, a: &Point3, b: &Point3) -> Option<(ScreenPoint, ScreenPoint)> {
        let mut ea = self.view * a.to_homogeneous();
        let mut eb = self.view * b.to_homogeneous();
        let (da, db) = (-ea.z, -eb.z);
        if da < Z_NEAR && db < Z_NEAR {
            return None;
        }
        if da < Z_NEAR {
            ea = near_crossing(&ea, &eb, da, db);
        } else if db < Z_NEAR {
            eb = near_crossing(&eb, &ea, db, da);
        }
        Some((self.to_screen(&ea), self.to_screen(&eb)))
    }

    fn to_screen(&self, eye: &Vector4<f64>) -> ScreenPoint {
        let clip = self.projection * eye;
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        ScreenPoint {
            x: (ndc_x + 1.0) * 0.5 * self.width,
            y: (1.0 - ndc_y) * 0.5 * self.height,
            depth: -eye.z,
        }
    }
}

/// Point where the eye-space segment from `behind` to `front` meets the near plane.
fn near_crossing(
    behind: &Vector4<f64>,
    front: &Vector4<f64>,
    behind_depth: f64,
    front_depth: f64,
) -> Vector4<f64> {
    let t = (Z_NEAR - behind_depth) / (front_depth - behind_depth);
    let mut p = behind + (front - behind) * t;
    p.z = -Z_NEAR;
    p
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Vector3;
    use approx::assert_relative_eq;

    fn front_camera() -> Projection {
        let pose = CameraPose {
            position: Point3::new(0.0, -20.0, 0.0),
            target: Point3::origin(),
            up: Vector3::z(),
        };
        Projection::new(&pose, 100, 100, 30_f64.to_radians())
    }

    #[test]
    fn target_lands_in_the_middle() {
        let p = front_camera().project(&Point3::origin()).unwrap();
        assert_relative_eq!(p.x, 50.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 50.0, epsilon = 1e-9);
        assert_relative_eq!(p.depth, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn up_is_towards_the_top_of_the_image() {
        let p = front_camera().project(&Point3::new(0.0, 0.0, 2.0)).unwrap();
        assert!(p.y < 50.0);
    }

    #[test]
    fn world_x_is_to_the_right_when_looking_along_y() {
        let p = front_camera().project(&Point3::new(2.0, 0.0, 0.0)).unwrap();
        assert!(p.x > 50.0);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        assert!(front_camera().project(&Point3::new(0.0, -30.0, 0.0)).is_none());
    }

    #[test]
    fn points_outside_the_frustum_are_culled() {
        assert!(front_camera().project(&Point3::new(100.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn segment_with_off_screen_ends_is_kept() {
        let (a, b) = front_camera()
            .project_segment(&Point3::new(-100.0, 0.0, 0.0), &Point3::new(100.0, 0.0, 0.0))
            .unwrap();
        assert!(a.x < 0.0 && b.x > 100.0);
        assert_relative_eq!(a.y, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn segment_through_the_eye_is_cut_at_the_near_plane() {
        let (a, b) = front_camera()
            .project_segment(&Point3::new(0.0, -40.0, 1.0), &Point3::new(0.0, 0.0, 1.0))
            .unwrap();
        assert_relative_eq!(a.depth, Z_NEAR, epsilon = 1e-9);
        assert_relative_eq!(b.depth, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn segment_behind_the_camera_is_dropped() {
        let camera = front_camera();
        let behind = camera.project_segment(&Point3::new(0.0, -30.0, 0.0), &Point3::new(5.0, -40.0, 0.0));
        assert!(behind.is_none());
    }
}
