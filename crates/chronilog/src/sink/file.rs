//! Size-rotating file sink.
//!
//! Backups are named `path.1` (newest) through `path.N` (oldest).

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::Sink;
use crate::config::RotationPolicy;
use crate::error::{ChronilogError, ChronilogResult};

/// Appends lines to a file, rotating by size.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    rotation: Option<RotationPolicy>,
    state: Mutex<FileState>,
}

#[derive(Debug)]
struct FileState {
    file: Option<File>,
    size: u64,
}

impl FileSink {
    /// Open `path` for appending, creating parent directories.
    ///
    /// With `wipe`, existing contents are truncated first.
    pub fn open(
        path: impl Into<PathBuf>,
        rotation: Option<RotationPolicy>,
        wipe: bool,
    ) -> ChronilogResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ChronilogError::io(parent, e))?;
        }

        let file = open_file(&path, wipe).map_err(|e| ChronilogError::io(&path, e))?;
        let size = file
            .metadata()
            .map_err(|e| ChronilogError::io(&path, e))?
            .len();

        Ok(Self {
            path,
            rotation,
            state: Mutex::new(FileState {
                file: Some(file),
                size,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rotation(&self) -> Option<RotationPolicy> {
        self.rotation
    }

    /// Bytes in the current file, as tracked by the sink.
    pub fn size(&self) -> u64 {
        self.state.lock().map(|s| s.size).unwrap_or(0)
    }

    fn needs_rotation(&self, current: u64, incoming: u64) -> bool {
        match self.rotation {
            // Without backups there is nowhere to roll over to; the file grows.
            Some(policy) if policy.max_bytes > 0 && policy.backup_count > 0 => {
                // An empty file is never rotated, even for an oversized line.
                current > 0 && current + incoming >= policy.max_bytes
            }
            _ => false,
        }
    }

    fn rotate(&self, state: &mut FileState) -> io::Result<()> {
        let backups = self.rotation.map_or(0, |p| p.backup_count);

        // Close before renaming.
        state.file = None;
        shift_backups(&self.path, backups)?;
        state.file = Some(open_file(&self.path, true)?);
        state.size = 0;
        Ok(())
    }
}

impl Sink for FileSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| io::Error::other("file sink poisoned"))?;
        let state = &mut *guard;

        let mut bytes = String::with_capacity(line.len() + 1);
        bytes.push_str(line);
        bytes.push('\n');
        let incoming = bytes.len() as u64;

        if self.needs_rotation(state.size, incoming) {
            self.rotate(state)?;
        }

        if state.file.is_none() {
            // A failed rotation left the file closed.
            state.file = Some(open_file(&self.path, false)?);
        }
        if let Some(file) = state.file.as_mut() {
            file.write_all(bytes.as_bytes())?;
            state.size += incoming;
        }
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("file sink poisoned"))?;
        match state.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn open_file(path: &Path, truncate: bool) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    if truncate {
        options.write(true).truncate(true);
    } else {
        options.append(true);
    }
    options.open(path)
}

/// `path.N`.
pub fn backup_path(path: &Path, n: u32) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{n}"));
    PathBuf::from(name)
}

/// Drop the oldest backup, shift `path.i` to `path.i+1`, move `path` to
/// `path.1`.
fn shift_backups(path: &Path, backups: u32) -> io::Result<()> {
    remove_if_exists(&backup_path(path, backups))?;
    for i in (1..backups).rev() {
        let from = backup_path(path, i);
        if from.exists() {
            fs::rename(&from, backup_path(path, i + 1))?;
        }
    }
    if path.exists() {
        fs::rename(path, backup_path(path, 1))?;
    }
    Ok(())
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn policy(max_bytes: u64, backup_count: u32) -> Option<RotationPolicy> {
        Some(RotationPolicy {
            max_bytes,
            backup_count,
        })
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/app.log");
        let sink = FileSink::open(&path, None, false).unwrap();
        sink.write_line("hello").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "old\n").unwrap();
        let sink = FileSink::open(&path, None, false).unwrap();
        assert_eq!(sink.size(), 4);
        sink.write_line("new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");
    }

    #[test]
    fn test_wipe_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "old\n").unwrap();
        let sink = FileSink::open(&path, None, true).unwrap();
        sink.write_line("fresh").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn test_rotation_keeps_bounded_backups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        // Each line is 10 bytes; a second line would reach the 20-byte limit.
        let sink = FileSink::open(&path, policy(20, 2), false).unwrap();
        for i in 0..8 {
            sink.write_line(&format!("line-{i:04}")).unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "line-0007\n");
        assert_eq!(
            fs::read_to_string(backup_path(&path, 1)).unwrap(),
            "line-0006\n"
        );
        assert_eq!(
            fs::read_to_string(backup_path(&path, 2)).unwrap(),
            "line-0005\n"
        );
        assert!(!backup_path(&path, 3).exists());
    }

    #[test]
    fn test_zero_backups_never_rolls_over() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileSink::open(&path, policy(30, 0), false).unwrap();
        for i in 0..6 {
            sink.write_line(&format!("important-{i}")).unwrap();
        }

        let text = fs::read_to_string(&path).unwrap();
        let expected: String = (0..6).map(|i| format!("important-{i}\n")).collect();
        assert_eq!(text, expected);
        assert_eq!(sink.size(), 72);
        assert!(!backup_path(&path, 1).exists());
    }

    #[test]
    fn test_zero_max_bytes_never_rotates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileSink::open(&path, policy(0, 3), false).unwrap();
        for _ in 0..50 {
            sink.write_line("0123456789").unwrap();
        }
        assert_eq!(sink.size(), 550);
        assert!(!backup_path(&path, 1).exists());
    }

    #[test]
    fn test_oversized_first_line_is_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let sink = FileSink::open(&path, policy(4, 1), false).unwrap();
        sink.write_line("much longer than four bytes").unwrap();
        assert!(!backup_path(&path, 1).exists());
        assert_eq!(sink.size(), 28);
    }

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("logs/app.log"), 3),
            PathBuf::from("logs/app.log.3")
        );
    }
}
