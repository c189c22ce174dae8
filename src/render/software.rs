use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, ImageFormat, RgbImage};
use tracing::{debug, info};

use crate::error::{RenderError, Result};
use crate::math::Rgb;
use crate::operations::camera::CameraPose;

use super::framebuffer::{EdlSettings, FrameBuffer};
use super::projection::Projection;
use super::{RenderSink, Scene};

/// Output parameters of the software renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Side length of each point splat in pixels.
    pub point_size: u32,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f64,
    /// Background color.
    pub background: Rgb,
    /// Wireframe color.
    pub line_color: Rgb,
    /// Eye-dome lighting applied after rasterization.
    pub edl: EdlSettings,
    /// Time each animation frame stays on screen.
    pub frame_delay_ms: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            point_size: 2,
            fov_y_degrees: 30.0,
            background: [0, 0, 0],
            line_color: [255, 255, 255],
            edl: EdlSettings::default(),
            frame_delay_ms: 100,
        }
    }
}

impl RenderSettings {
    /// Checks that the settings describe a drawable image.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty image or a field of view outside `(0, 180)`.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidParameters(format!(
                "resolution must be non-zero, got {}x{}",
                self.width, self.height
            ))
            .into());
        }
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(RenderError::InvalidParameters(format!(
                "field of view must be in (0, 180) degrees, got {}",
                self.fov_y_degrees
            ))
            .into());
        }
        Ok(())
    }
}

/// CPU point-cloud renderer.
///
/// `display` writes a still PNG seen from a fixed preview pose; `animate`
/// writes a looping GIF with one frame per pose.
#[derive(Debug, Clone)]
pub struct SoftwareRenderer {
    settings: RenderSettings,
    preview_pose: CameraPose,
    preview_path: PathBuf,
    animation_path: PathBuf,
}

impl SoftwareRenderer {
    /// Creates a new renderer.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` are invalid.
    pub fn new(
        settings: RenderSettings,
        preview_pose: CameraPose,
        preview_path: impl Into<PathBuf>,
        animation_path: impl Into<PathBuf>,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            preview_pose,
            preview_path: preview_path.into(),
            animation_path: animation_path.into(),
        })
    }

    /// Returns the render settings.
    #[must_use]
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Returns where `display` writes its image.
    #[must_use]
    pub fn preview_path(&self) -> &Path {
        &self.preview_path
    }

    /// Returns where `animate` writes its animation.
    #[must_use]
    pub fn animation_path(&self) -> &Path {
        &self.animation_path
    }

    /// Rasterizes `scene` as seen from `pose`.
    #[must_use]
    pub fn render_frame(&self, scene: &Scene, pose: &CameraPose) -> RgbImage {
        let s = &self.settings;
        let camera = Projection::new(pose, s.width, s.height, s.fov_y_degrees.to_radians());
        let mut frame = FrameBuffer::new(s.width, s.height, s.background);

        for (point, &color) in scene.points().iter().zip(scene.colors()) {
            if let Some(p) = camera.project(point) {
                frame.splat(&p, s.point_size, color);
            }
        }
        for segment in scene.lines().chunks_exact(2) {
            if let Some((a, b)) = camera.project_segment(&segment[0], &segment[1]) {
                frame.line(&a, &b, s.line_color);
            }
        }

        frame.eye_dome_lighting(s.edl);
        frame.into_image()
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(RenderError::from)?;
    }
    Ok(())
}

impl RenderSink for SoftwareRenderer {
    fn display(&mut self, scene: &Scene) -> Result<()> {
        ensure_parent(&self.preview_path)?;
        let image = self.render_frame(scene, &self.preview_pose);
        let file = File::create(&self.preview_path).map_err(RenderError::from)?;
        let mut writer = BufWriter::new(file);
        image
            .write_to(&mut writer, ImageFormat::Png)
            .map_err(RenderError::from)?;
        writer.flush().map_err(RenderError::from)?;
        info!(path = %self.preview_path.display(), "preview written");
        Ok(())
    }

    fn animate(&mut self, scene: &Scene, poses: &[CameraPose]) -> Result<()> {
        ensure_parent(&self.animation_path)?;
        let file = File::create(&self.animation_path).map_err(RenderError::from)?;
        let mut writer = BufWriter::new(file);
        {
            let mut encoder = GifEncoder::new(&mut writer);
            encoder
                .set_repeat(Repeat::Infinite)
                .map_err(RenderError::from)?;

            let delay = Delay::from_numer_denom_ms(self.settings.frame_delay_ms, 1);
            for (i, pose) in poses.iter().enumerate() {
                let rgba = DynamicImage::ImageRgb8(self.render_frame(scene, pose)).into_rgba8();
                encoder
                    .encode_frame(Frame::from_parts(rgba, 0, 0, delay))
                    .map_err(RenderError::from)?;
                debug!(frame = i + 1, total = poses.len(), "frame encoded");
            }
        }
        // The trailer is written when the encoder drops; flushing surfaces its errors.
        writer.flush().map_err(RenderError::from)?;

        info!(path = %self.animation_path.display(), frames = poses.len(), "animation written");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Octahedron;
    use crate::math::Point3;
    use crate::operations::camera::Orbit;

    fn small_settings() -> RenderSettings {
        RenderSettings {
            width: 64,
            height: 48,
            ..RenderSettings::default()
        }
    }

    fn scene() -> Scene {
        let octa = Octahedron::new(Point3::origin(), 10.0);
        Scene::new(
            vec![Point3::origin(), Point3::new(0.0, 0.0, 5.0)],
            vec![[255, 0, 0], [0, 255, 0]],
            octa.wireframe(),
        )
        .unwrap()
    }

    fn renderer(dir: &Path) -> SoftwareRenderer {
        SoftwareRenderer::new(
            small_settings(),
            Orbit::new(120, 2.0).pose(0),
            dir.join("preview.png"),
            dir.join("anim.gif"),
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_resolution() {
        let settings = RenderSettings {
            width: 0,
            ..RenderSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn rejects_bad_field_of_view() {
        let settings = RenderSettings {
            fov_y_degrees: 180.0,
            ..RenderSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn frame_has_configured_size_and_draws_something() {
        let dir = tempfile::tempdir().unwrap();
        let r = renderer(dir.path());
        let img = r.render_frame(&scene(), &Orbit::new(4, 1.0).pose(1));
        assert_eq!(img.dimensions(), (64, 48));
        assert!(img.pixels().any(|p| p.0 != [0, 0, 0]));
    }

    #[test]
    fn empty_scene_renders_background() {
        let dir = tempfile::tempdir().unwrap();
        let r = renderer(dir.path());
        let img = r.render_frame(&Scene::default(), &Orbit::new(4, 1.0).pose(0));
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn wireframe_is_drawn_when_vertices_leave_the_frame() {
        let dir = tempfile::tempdir().unwrap();
        let r = renderer(dir.path());
        let lines_only = Scene::new(
            Vec::new(),
            Vec::new(),
            Octahedron::new(Point3::origin(), 10.0).wireframe(),
        )
        .unwrap();
        // Both views look straight at a wireframe edge whose end vertices are off-screen.
        for pose in [Orbit::new(4, 1.0).pose(0), Orbit::new(4, 1.0).pose(1)] {
            let img = r.render_frame(&lines_only, &pose);
            assert!(img.pixels().any(|p| p.0 != [0, 0, 0]));
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn write_failures_are_reported() {
        let mut r = SoftwareRenderer::new(
            small_settings(),
            Orbit::new(120, 2.0).pose(0),
            "/dev/full",
            "/dev/full",
        )
        .unwrap();
        assert!(r.animate(&scene(), &Orbit::new(2, 2.0).execute()).is_err());
        assert!(r.display(&scene()).is_err());
    }

    #[test]
    fn display_writes_png_preview() {
        let dir = tempfile::tempdir().unwrap();
        let mut r = renderer(dir.path());
        r.display(&scene()).unwrap();
        let img = image::open(r.preview_path()).unwrap();
        assert_eq!((img.width(), img.height()), (64, 48));
    }

    #[test]
    fn animate_writes_one_gif_frame_per_pose() {
        use image::AnimationDecoder;

        let dir = tempfile::tempdir().unwrap();
        let mut r = renderer(dir.path());
        r.animate(&scene(), &Orbit::new(3, 2.0).execute()).unwrap();

        let file = File::open(r.animation_path()).unwrap();
        let decoder = image::codecs::gif::GifDecoder::new(std::io::BufReader::new(file)).unwrap();
        assert_eq!(decoder.into_frames().count(), 3);
    }
}
