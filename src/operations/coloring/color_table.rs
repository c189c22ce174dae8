use crate::error::{ContractError, Result};
use crate::geometry::VERTEX_COUNT;
use crate::math::Rgb;

/// Per-vertex colors, indexed in the octahedron's vertex order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTable {
    entries: [Rgb; VERTEX_COUNT],
}

impl ColorTable {
    /// Creates a color table from exactly six entries.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::ColorTableSize`] if `entries` does not hold
    /// one color per octahedron vertex.
    pub fn new(entries: &[Rgb]) -> Result<Self> {
        let entries = <[Rgb; VERTEX_COUNT]>::try_from(entries).map_err(|_| {
            ContractError::ColorTableSize {
                expected: VERTEX_COUNT,
                actual: entries.len(),
            }
        })?;
        Ok(Self { entries })
    }

    /// Returns the color for `label`, or `None` if it is not a vertex index.
    #[must_use]
    pub fn get(&self, label: u8) -> Option<Rgb> {
        self.entries.get(usize::from(label)).copied()
    }

    /// Returns all entries in vertex order.
    #[must_use]
    pub fn entries(&self) -> &[Rgb; VERTEX_COUNT] {
        &self.entries
    }
}

impl Default for ColorTable {
    /// Red, green, blue, yellow, magenta, cyan.
    fn default() -> Self {
        Self {
            entries: [
                [255, 0, 0],
                [0, 255, 0],
                [0, 0, 255],
                [255, 255, 0],
                [255, 0, 255],
                [0, 255, 255],
            ],
        }
    }
}
