use crate::error::{ContractError, OctaflakeError, Result};
use crate::fractal::MAX_LABEL;
use crate::math::Rgb;

use super::ColorTable;

/// Maps vertex labels to RGB colors through a [`ColorTable`].
#[derive(Debug, Clone, Copy)]
pub struct Colorize<'a> {
    labels: &'a [u8],
    table: &'a ColorTable,
}

impl<'a> Colorize<'a> {
    /// Creates a new `Colorize` operation.
    #[must_use]
    pub fn new(labels: &'a [u8], table: &'a ColorTable) -> Self {
        Self { labels, table }
    }

    /// Executes the lookup, returning one color per label.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::LabelOutOfRange`] if any label is not a
    /// vertex index. Labels are never clamped.
    pub fn execute(&self) -> Result<Vec<Rgb>> {
        self.labels
            .iter()
            .enumerate()
            .map(|(index, &label)| {
                self.table.get(label).ok_or_else(|| {
                    OctaflakeError::from(ContractError::LabelOutOfRange {
                        index,
                        label,
                        max: MAX_LABEL,
                    })
                })
            })
            .collect()
    }
}
