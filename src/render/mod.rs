mod framebuffer;
mod projection;
mod software;

pub use framebuffer::{EdlSettings, FrameBuffer};
pub use projection::{Projection, ScreenPoint};
pub use software::{RenderSettings, SoftwareRenderer};

use crate::error::{RenderError, Result};
use crate::fractal::Fractal;
use crate::geometry::Octahedron;
use crate::math::{Point3, Rgb};
use crate::operations::camera::CameraPose;
use crate::operations::coloring::{ColorTable, Colorize};

/// Everything a render sink draws: a colored point cloud and a wireframe.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    points: Vec<Point3>,
    colors: Vec<Rgb>,
    lines: Vec<Point3>,
}

impl Scene {
    /// Creates a scene from points, one color per point, and flattened
    /// line segment endpoints (`lines[2k]` to `lines[2k + 1]`).
    ///
    /// # Errors
    ///
    /// Returns an error if the color count differs from the point count or
    /// `lines` has an odd number of endpoints.
    pub fn new(points: Vec<Point3>, colors: Vec<Rgb>, lines: Vec<Point3>) -> Result<Self> {
        if points.len() != colors.len() {
            return Err(RenderError::ColorCountMismatch {
                points: points.len(),
                colors: colors.len(),
            }
            .into());
        }
        if lines.len() % 2 != 0 {
            return Err(RenderError::InvalidParameters(format!(
                "line endpoints must come in pairs, got {}",
                lines.len()
            ))
            .into());
        }
        Ok(Self {
            points,
            colors,
            lines,
        })
    }

    /// Builds the scene for a generated fractal: points colored by vertex
    /// label plus the octahedron wireframe.
    ///
    /// # Errors
    ///
    /// Returns an error if a label has no entry in `table`.
    pub fn from_fractal(
        fractal: Fractal,
        table: &ColorTable,
        octahedron: &Octahedron,
    ) -> Result<Self> {
        let (points, labels) = fractal.into_parts();
        let colors = Colorize::new(&labels, table).execute()?;
        Self::new(points, colors, octahedron.wireframe())
    }

    /// Returns the point positions.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Returns the per-point colors.
    #[must_use]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Returns the line segment endpoints.
    #[must_use]
    pub fn lines(&self) -> &[Point3] {
        &self.lines
    }
}

/// A consumer of rendered scenes.
///
/// Both calls are synchronous and all-or-nothing from the caller's point of
/// view; backend failures are returned as errors.
pub trait RenderSink {
    /// Presents `scene` for viewing and returns once the presentation ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn display(&mut self, scene: &Scene) -> Result<()>;

    /// Renders one frame of `scene` per pose into an animation and finalizes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn animate(&mut self, scene: &Scene, poses: &[CameraPose]) -> Result<()>;
}
