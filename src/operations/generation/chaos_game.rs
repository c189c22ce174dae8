use rand::Rng;
use tracing::{debug, info};

use crate::fractal::Fractal;
use crate::geometry::{Octahedron, VERTEX_COUNT};
use crate::math::Point3;

/// Runs the chaos game over the vertices of an octahedron.
///
/// Starting from the center, each step picks a vertex uniformly at random
/// and moves the current point halfway toward it. Every intermediate point
/// is recorded together with the index of the chosen vertex.
///
/// Since every vertex lies within `|radius|` of the center along a single
/// axis and the walk starts at the center, each generated point satisfies
/// `|p - center|∞ <= |radius|`.
#[derive(Debug, Clone, Copy)]
pub struct ChaosGame {
    octahedron: Octahedron,
    iterations: usize,
}

impl ChaosGame {
    /// Creates a new `ChaosGame` operation.
    #[must_use]
    pub fn new(center: Point3, radius: f64, iterations: usize) -> Self {
        Self {
            octahedron: Octahedron::new(center, radius),
            iterations,
        }
    }

    /// Returns the attractor octahedron.
    #[must_use]
    pub fn octahedron(&self) -> &Octahedron {
        &self.octahedron
    }

    /// Returns the number of steps this operation will run.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Executes the chaos game, drawing vertex choices from `rng`.
    ///
    /// A seeded generator reproduces the same fractal on every run.
    pub fn execute<R: Rng + ?Sized>(&self, rng: &mut R) -> Fractal {
        self.execute_with_progress(rng, 0, |_| {})
    }

    /// Executes the chaos game, calling `on_progress` with the number of
    /// completed steps every `interval` steps and once at the end.
    ///
    /// An `interval` of zero disables the periodic calls.
    pub fn execute_with_progress<R, F>(
        &self,
        rng: &mut R,
        interval: usize,
        mut on_progress: F,
    ) -> Fractal
    where
        R: Rng + ?Sized,
        F: FnMut(usize),
    {
        info!(
            iterations = self.iterations,
            radius = self.octahedron.radius(),
            "running chaos game"
        );

        let vertices = self.octahedron.vertices();
        let mut fractal = Fractal::with_capacity(self.iterations);
        let mut current = *self.octahedron.center();

        #[allow(clippy::cast_possible_truncation)]
        let label_bound = VERTEX_COUNT as u8;

        for step in 1..=self.iterations {
            let label = rng.gen_range(0..label_bound);
            let vertex = vertices[usize::from(label)];
            current = Point3::from((current.coords + vertex.coords) / 2.0);
            fractal.push(current, label);

            if interval != 0 && step % interval == 0 {
                on_progress(step);
            }
        }
        if interval == 0 || self.iterations % interval != 0 {
            on_progress(self.iterations);
        }

        debug!(points = fractal.len(), "chaos game finished");
        fractal
    }
}
