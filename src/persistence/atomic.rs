//! Crash-safe file replacement.
//!
//! Data is written to a temporary file next to the target, synced, and then
//! renamed over the target. Readers see either the old file or the complete
//! new one, never a partial write.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;

/// Temporary sibling path used while `path` is being rewritten.
fn temp_path(path: &Path) -> Result<PathBuf, PersistenceError> {
    let parent = parent_dir(path)?;
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("snapshot");
    Ok(parent.join(format!(".{file_name}.tmp.{}", std::process::id())))
}

/// Parent directory of `path`; a bare file name resolves to the current directory.
fn parent_dir(path: &Path) -> Result<&Path, PersistenceError> {
    match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Ok(Path::new(".")),
        Some(p) => Ok(p),
        None => Err(PersistenceError::NoParentDir(path.to_path_buf())),
    }
}

/// Atomically replaces `path` with whatever `write` produces.
///
/// On failure the temporary file is removed and any existing file at `path`
/// is left untouched.
///
/// # Errors
///
/// Returns an error if `path` has no parent directory, if `write` fails, or
/// if any file operation fails.
pub fn atomic_write<F>(path: &Path, write: F) -> Result<(), PersistenceError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), PersistenceError>,
{
    let parent = parent_dir(path)?;
    fs::create_dir_all(parent)?;

    let temp = temp_path(path)?;
    let result = write_and_sync(&temp, write).and_then(|()| Ok(fs::rename(&temp, path)?));
    if result.is_err() {
        let _ = fs::remove_file(&temp);
        return result;
    }
    sync_dir(parent)?;
    Ok(())
}

/// Syncs `dir` so a rename inside it survives a crash.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<(), PersistenceError> {
    File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<(), PersistenceError> {
    Ok(())
}

fn write_and_sync<F>(temp: &Path, write: F) -> Result<(), PersistenceError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), PersistenceError>,
{
    let mut writer = BufWriter::new(File::create(temp)?);
    write(&mut writer)?;
    writer.flush()?;
    let file = writer.into_inner().map_err(std::io::IntoInnerError::into_error)?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn writes_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        atomic_write(&path, |w| Ok(w.write_all(b"hello")?)).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        fs::write(&path, b"old contents").unwrap();
        atomic_write(&path, |w| Ok(w.write_all(b"new")?)).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn failed_write_keeps_old_file_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        fs::write(&path, b"old").unwrap();

        let result = atomic_write(&path, |w| {
            w.write_all(b"partial")?;
            Err(PersistenceError::Corrupt("boom".into()))
        });
        assert!(result.is_err());
        assert_eq!(fs::read(&path).unwrap(), b"old");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.bin");
        atomic_write(&path, |w| Ok(w.write_all(b"x")?)).unwrap();
        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn directory_sync_requires_an_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(sync_dir(dir.path()).is_ok());
        assert!(sync_dir(&dir.path().join("gone")).is_err());
    }

    #[test]
    fn bare_file_name_uses_current_directory() {
        assert_eq!(parent_dir(Path::new("fractal_data.bin")).unwrap(), Path::new("."));
    }
}
