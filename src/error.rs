use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the octaflake pipeline.
#[derive(Debug, Error)]
pub enum OctaflakeError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Caller misuse of a pipeline stage.
///
/// These are never produced by well-formed pipeline data; they indicate a
/// broken invariant upstream and should abort the run.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("expected {expected} octahedron vertices, got {actual}")]
    VertexCount { expected: usize, actual: usize },

    #[error("color table must have {expected} entries, got {actual}")]
    ColorTableSize { expected: usize, actual: usize },

    #[error("label {label} at index {index} is out of range [0, {max}]")]
    LabelOutOfRange { index: usize, label: u8, max: u8 },

    #[error("points and labels differ in length ({points} vs {labels})")]
    LengthMismatch { points: usize, labels: usize },
}

/// Errors raised while saving or loading a snapshot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("no snapshot found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("path has no parent directory: {}", .0.display())]
    NoParentDir(PathBuf),

    #[error("corrupt snapshot: {0}")]
    Corrupt(String),

    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a render sink.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid render parameters: {0}")]
    InvalidParameters(String),

    #[error("scene has {points} points but {colors} colors")]
    ColorCountMismatch { points: usize, colors: usize },

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("render I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for results using [`OctaflakeError`].
pub type Result<T> = std::result::Result<T, OctaflakeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_errors_convert_to_top_level() {
        let err: OctaflakeError = ContractError::LabelOutOfRange {
            index: 3,
            label: 9,
            max: 5,
        }
        .into();
        assert!(matches!(err, OctaflakeError::Contract(_)));
        assert_eq!(err.to_string(), "label 9 at index 3 is out of range [0, 5]");
    }

    #[test]
    fn not_found_mentions_path() {
        let err = PersistenceError::NotFound(PathBuf::from("fractal_data.bin"));
        assert!(err.to_string().contains("fractal_data.bin"));
    }

    #[test]
    fn version_error_display() {
        let err = PersistenceError::UnsupportedVersion {
            found: 7,
            expected: 1,
        };
        assert_eq!(
            err.to_string(),
            "unsupported snapshot version 7 (expected 1)"
        );
    }
}
