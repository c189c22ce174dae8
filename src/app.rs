//! The three terminal actions of a run: generate, display, animate.

use std::path::PathBuf;
use std::str::FromStr;

use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::fractal::Fractal;
use crate::geometry::Octahedron;
use crate::operations::generation::ChaosGame;
use crate::persistence::SnapshotFile;
use crate::render::{RenderSink, Scene};

/// Number of progress bar updates over a full generation run.
const PROGRESS_TICKS: usize = 1000;

/// A menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Generate a new fractal and persist it.
    Generate,
    /// Load the snapshot and show it.
    Display,
    /// Load the snapshot and export a rotating animation.
    Animate,
}

impl FromStr for Choice {
    type Err = ();

    /// Parses a single menu token; surrounding whitespace is ignored.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::Generate),
            "2" => Ok(Self::Display),
            "3" => Ok(Self::Animate),
            _ => Err(()),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new snapshot was written.
    Generated { path: PathBuf, points: usize },
    /// The snapshot was handed to the sink for display.
    Displayed { points: usize },
    /// An animation was exported.
    Animated { frames: usize },
    /// A load action was chosen but no snapshot exists.
    MissingSnapshot(PathBuf),
    /// The input was not a menu choice.
    InvalidChoice,
}

/// Parses `input` and runs the selected action.
///
/// # Errors
///
/// Returns an error if generation, persistence or rendering fails. An
/// unknown choice or a missing snapshot is reported through [`Outcome`].
pub fn run(config: &Config, input: &str, sink: &mut dyn RenderSink) -> Result<Outcome> {
    match input.parse::<Choice>() {
        Ok(choice) => execute(config, choice, sink),
        Err(()) => {
            warn!(input = input.trim(), "invalid menu choice");
            Ok(Outcome::InvalidChoice)
        }
    }
}

/// Runs one action.
///
/// # Errors
///
/// Returns an error if generation, persistence or rendering fails.
pub fn execute(config: &Config, choice: Choice, sink: &mut dyn RenderSink) -> Result<Outcome> {
    let snapshot = SnapshotFile::new(config.snapshot_path());
    match choice {
        Choice::Generate => {
            let fractal = generate(config);
            snapshot.save(&fractal)?;
            Ok(Outcome::Generated {
                path: snapshot.path().to_path_buf(),
                points: fractal.len(),
            })
        }
        Choice::Display | Choice::Animate if !snapshot.exists() => {
            warn!(path = %snapshot.path().display(), "no snapshot to load");
            Ok(Outcome::MissingSnapshot(snapshot.path().to_path_buf()))
        }
        Choice::Display => {
            let scene = load_scene(config, &snapshot)?;
            let points = scene.points().len();
            sink.display(&scene)?;
            Ok(Outcome::Displayed { points })
        }
        Choice::Animate => {
            let scene = load_scene(config, &snapshot)?;
            let poses = config.orbit().execute();
            info!(frames = poses.len(), zoom = config.zoom, "exporting animation");
            sink.animate(&scene, &poses)?;
            Ok(Outcome::Animated {
                frames: poses.len(),
            })
        }
    }
}

/// Runs the chaos game described by `config`.
#[must_use]
pub fn generate(config: &Config) -> Fractal {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let game = ChaosGame::new(config.center, config.radius, config.iterations);

    let bar = if config.show_progress {
        progress_bar(config.iterations)
    } else {
        ProgressBar::hidden()
    };
    let interval = (config.iterations / PROGRESS_TICKS).max(1);
    let fractal = game.execute_with_progress(&mut rng, interval, |done| {
        bar.set_position(done as u64);
    });
    bar.finish_and_clear();
    fractal
}

fn progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(total as u64);
    bar.set_style(
        ProgressStyle::with_template("[{bar:40.green/blue}] {pos}/{len} points ({percent}%) {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏"),
    );
    bar
}

fn load_scene(config: &Config, snapshot: &SnapshotFile) -> Result<Scene> {
    let fractal = snapshot.load()?;
    let octahedron = Octahedron::new(config.center, config.radius);
    Scene::from_fractal(fractal, &config.color_table, &octahedron)
}
