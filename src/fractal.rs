use crate::error::{ContractError, Result};
use crate::geometry::VERTEX_COUNT;
use crate::math::Point3;

/// Largest valid vertex label.
#[allow(clippy::cast_possible_truncation)]
pub const MAX_LABEL: u8 = (VERTEX_COUNT - 1) as u8;

/// The output of one chaos-game run.
///
/// `points[i]` is the `i`-th generated point and `labels[i]` the index of
/// the octahedron vertex chosen at that step. Both vectors always have the
/// same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fractal {
    points: Vec<Point3>,
    labels: Vec<u8>,
}

impl Fractal {
    /// Builds a fractal from parallel point and label sequences.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequences differ in length or a label is
    /// not a vertex index.
    pub fn new(points: Vec<Point3>, labels: Vec<u8>) -> Result<Self> {
        if points.len() != labels.len() {
            return Err(ContractError::LengthMismatch {
                points: points.len(),
                labels: labels.len(),
            }
            .into());
        }
        check_labels(&labels)?;
        Ok(Self { points, labels })
    }

    /// Creates an empty fractal with room for `capacity` steps.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
            labels: Vec::with_capacity(capacity),
        }
    }

    /// Appends one generation step.
    pub(crate) fn push(&mut self, point: Point3, label: u8) {
        debug_assert!(label <= MAX_LABEL);
        self.points.push(point);
        self.labels.push(label);
    }

    /// Returns the generated points in generation order.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Returns the vertex label of each point.
    #[must_use]
    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    /// Returns the number of generated points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no points were generated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Splits the fractal into its point and label sequences.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Point3>, Vec<u8>) {
        (self.points, self.labels)
    }
}

/// Checks that every label is a valid vertex index.
///
/// # Errors
///
/// Returns [`ContractError::LabelOutOfRange`] for the first offending label.
pub fn check_labels(labels: &[u8]) -> Result<()> {
    match labels.iter().position(|&l| l > MAX_LABEL) {
        Some(index) => Err(ContractError::LabelOutOfRange {
            index,
            label: labels[index],
            max: MAX_LABEL,
        }
        .into()),
        None => Ok(()),
    }
}
