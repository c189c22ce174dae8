use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{PersistenceError, Result};
use crate::fractal::Fractal;
use crate::math::Point3;

use super::atomic::atomic_write;

/// Leading bytes of every snapshot file.
pub const MAGIC: [u8; 4] = *b"OCTA";

/// Current snapshot format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    magic: [u8; 4],
    version: u32,
}

/// Serializes points as `[x, y, z]` triples without copying the slice.
struct PointsRef<'a>(&'a [Point3]);

impl Serialize for PointsRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|p| [p.x, p.y, p.z]))
    }
}

/// A fractal snapshot stored in a single file.
///
/// # Format
///
/// Little-endian, `bincode` 1.x default encoding:
///
/// ```text
/// magic    [u8; 4]   "OCTA"
/// version  u32       1
/// points   u64 n, then n × [f64; 3]
/// labels   u64 n, then n × u8
/// ```
///
/// Saving replaces any previous snapshot atomically.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Creates a handle for the snapshot at `path`. Nothing is read or written.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the snapshot path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if a snapshot file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes `fractal` as the new snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or any file operation fails.
    pub fn save(&self, fractal: &Fractal) -> Result<()> {
        atomic_write(&self.path, |w| encode(w, fractal))?;
        info!(path = %self.path.display(), points = fractal.len(), "snapshot saved");
        Ok(())
    }

    /// Reads the snapshot back.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if no snapshot exists, and a
    /// corruption or version error if the file is not a valid snapshot.
    pub fn load(&self) -> Result<Fractal> {
        if !self.exists() {
            return Err(PersistenceError::NotFound(self.path.clone()).into());
        }
        let mut reader = BufReader::new(File::open(&self.path).map_err(PersistenceError::from)?);
        let fractal = decode(&mut reader)?;
        info!(path = %self.path.display(), points = fractal.len(), "snapshot loaded");
        Ok(fractal)
    }
}

fn encode<W: Write>(
    writer: &mut W,
    fractal: &Fractal,
) -> std::result::Result<(), PersistenceError> {
    let header = Header {
        magic: MAGIC,
        version: FORMAT_VERSION,
    };
    bincode::serialize_into(&mut *writer, &header)?;
    bincode::serialize_into(&mut *writer, &PointsRef(fractal.points()))?;
    bincode::serialize_into(&mut *writer, fractal.labels())?;
    Ok(())
}

fn decode<R: Read>(reader: &mut R) -> std::result::Result<Fractal, PersistenceError> {
    let header: Header = bincode::deserialize_from(&mut *reader)
        .map_err(|e| PersistenceError::Corrupt(format!("unreadable header: {e}")))?;
    if header.magic != MAGIC {
        return Err(PersistenceError::Corrupt(format!("bad magic {:?}", header.magic)));
    }
    if header.version != FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: header.version,
            expected: FORMAT_VERSION,
        });
    }
    debug!(version = header.version, "snapshot header ok");

    let points: Vec<[f64; 3]> = bincode::deserialize_from(&mut *reader)?;
    let labels: Vec<u8> = bincode::deserialize_from(&mut *reader)?;
    let points = points.into_iter().map(Point3::from).collect();

    Fractal::new(points, labels).map_err(|e| PersistenceError::Corrupt(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::OctaflakeError;

    fn sample() -> Fractal {
        Fractal::new(
            vec![
                Point3::new(5.0, 0.0, 0.0),
                Point3::new(2.5, 5.0, 0.0),
                Point3::new(1.25, 2.5, -5.0),
            ],
            vec![0, 2, 5],
        )
        .unwrap()
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("fractal_data.bin"));
        assert!(!file.exists());

        file.save(&sample()).unwrap();
        assert!(file.exists());
        assert_eq!(file.load().unwrap(), sample());
    }

    #[test]
    fn empty_fractal_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("empty.bin"));
        file.save(&Fractal::default()).unwrap();
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn layout_is_header_then_counted_arrays() {
        let mut bytes = Vec::new();
        encode(&mut bytes, &sample()).unwrap();

        assert_eq!(&bytes[0..4], b"OCTA");
        assert_eq!(&bytes[4..8], &1_u32.to_le_bytes());
        assert_eq!(&bytes[8..16], &3_u64.to_le_bytes());
        assert_eq!(&bytes[16..24], &5.0_f64.to_le_bytes());
        let labels_at = 16 + 3 * 24;
        assert_eq!(&bytes[labels_at..labels_at + 8], &3_u64.to_le_bytes());
        assert_eq!(&bytes[labels_at + 8..], &[0_u8, 2, 5]);
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let file = SnapshotFile::new(dir.path().join("fractal_data.bin"));
        file.save(&sample()).unwrap();

        let smaller = Fractal::new(vec![Point3::origin()], vec![4]).unwrap();
        file.save(&smaller).unwrap();
        assert_eq!(file.load().unwrap(), smaller);
    }

    #[test]
    fn load_reads_through_the_file_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fractal_data.bin");
        let mut bytes = Vec::new();
        encode(&mut bytes, &sample()).unwrap();
        std::fs::write(&path, bytes).unwrap();
        assert_eq!(SnapshotFile::new(path).load().unwrap(), sample());
    }

    #[test]
    fn load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = SnapshotFile::new(dir.path().join("nope.bin")).load().unwrap_err();
        assert!(matches!(
            err,
            OctaflakeError::Persistence(PersistenceError::NotFound(_))
        ));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut bytes = Vec::new();
        encode(&mut bytes, &sample()).unwrap();
        bytes[0] = b'X';
        let err = decode(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt(_)));
    }

    #[test]
    fn future_version_is_rejected() {
        let mut bytes = Vec::new();
        encode(&mut bytes, &sample()).unwrap();
        bytes[4..8].copy_from_slice(&2_u32.to_le_bytes());
        let err = decode(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::UnsupportedVersion { found: 2, expected: 1 }
        ));
    }

    #[test]
    fn out_of_range_label_is_corrupt() {
        let mut bytes = Vec::new();
        encode(&mut bytes, &sample()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] = 9;
        let err = decode(&mut bytes.as_slice()).unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt(_)));
    }

    #[test]
    fn truncated_file_fails() {
        let mut bytes = Vec::new();
        encode(&mut bytes, &sample()).unwrap();
        bytes.truncate(30);
        assert!(decode(&mut bytes.as_slice()).is_err());
    }
}
