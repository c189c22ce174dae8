use std::path::{Path, PathBuf};

use crate::math::Point3;
use crate::operations::camera::{CameraPose, Orbit};
use crate::operations::coloring::ColorTable;
use crate::render::RenderSettings;

/// Run configuration shared by every entry point.
///
/// `Default` reproduces the stock run: 200 million iterations over a
/// radius-10 octahedron at the origin, a 120-frame orbit at zoom 2, and
/// artifacts named `fractal_data.*` in the working directory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of chaos-game steps.
    pub iterations: usize,
    /// Octahedron center.
    pub center: Point3,
    /// Octahedron radius.
    pub radius: f64,
    /// Directory holding the snapshot, preview and animation.
    pub output_dir: PathBuf,
    /// Shared file name stem of all artifacts.
    pub file_stem: String,
    /// Number of animation frames.
    pub frame_count: usize,
    /// Orbit zoom factor.
    pub zoom: f64,
    /// RNG seed; `None` seeds from system entropy.
    pub seed: Option<u64>,
    /// Colors per vertex label.
    pub color_table: ColorTable,
    /// Image output settings.
    pub render: RenderSettings,
    /// Show a progress bar while generating.
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: 200_000_000,
            center: Point3::origin(),
            radius: 10.0,
            output_dir: PathBuf::from("."),
            file_stem: "fractal_data".to_owned(),
            frame_count: 120,
            zoom: 2.0,
            seed: None,
            color_table: ColorTable::default(),
            render: RenderSettings::default(),
            show_progress: true,
        }
    }
}

impl Config {
    /// Sets the iteration count.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the octahedron center and radius.
    #[must_use]
    pub fn with_octahedron(mut self, center: Point3, radius: f64) -> Self {
        self.center = center;
        self.radius = radius;
        self
    }

    /// Sets the artifact directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the animation frame count and zoom.
    #[must_use]
    pub fn with_orbit(mut self, frame_count: usize, zoom: f64) -> Self {
        self.frame_count = frame_count;
        self.zoom = zoom;
        self
    }

    /// Fixes the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replaces the render settings.
    #[must_use]
    pub fn with_render(mut self, render: RenderSettings) -> Self {
        self.render = render;
        self
    }

    /// Enables or disables the generation progress bar.
    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn artifact(&self, extension: &str) -> PathBuf {
        self.output_dir.join(Path::new(&self.file_stem).with_extension(extension))
    }

    /// Path of the persisted snapshot.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.artifact("bin")
    }

    /// Path of the exported animation.
    #[must_use]
    pub fn animation_path(&self) -> PathBuf {
        self.artifact("gif")
    }

    /// Path of the still preview.
    #[must_use]
    pub fn preview_path(&self) -> PathBuf {
        self.artifact("png")
    }

    /// The orbit the animation follows.
    #[must_use]
    pub fn orbit(&self) -> Orbit {
        Orbit::new(self.frame_count, self.zoom)
    }

    /// Viewpoint of the still preview: the first frame of the orbit.
    #[must_use]
    pub fn preview_pose(&self) -> CameraPose {
        self.orbit().pose(0)
    }
}
