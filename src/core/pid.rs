//! # PID file.
//!
//! Writes `<dir>/<pid>.pid` (decimal process id) when the supervisor starts
//! and deletes it on teardown. A relative `dir` is resolved against the current
//! working directory; missing parent directories are created.

use std::path::{Path, PathBuf};
use std::{env, fs, process};

use crate::error::RuntimeError;

/// A PID file written on disk; call [`PidFile::remove`] to delete it.
#[derive(Debug)]
pub(crate) struct PidFile {
    path: PathBuf,
}

impl PidFile {
    /// Writes the PID file for the current process into `dir`.
    pub(crate) fn create(dir: &Path) -> Result<Self, RuntimeError> {
        let pid = process::id();
        let path = Self::resolve(dir, pid)?;

        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, pid.to_string())
        };
        write().map_err(|source| RuntimeError::PidFile {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path })
    }

    /// Full path of the file.
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the file.
    pub(crate) fn remove(self) -> Result<PathBuf, RuntimeError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(self.path),
            Err(source) => Err(RuntimeError::PidFile {
                path: self.path,
                source,
            }),
        }
    }

    fn resolve(dir: &Path, pid: u32) -> Result<PathBuf, RuntimeError> {
        let file = format!("{pid}.pid");
        if dir.is_absolute() {
            return Ok(dir.join(file));
        }
        let cwd = env::current_dir().map_err(|source| RuntimeError::PidFile {
            path: dir.join(&file),
            source,
        })?;
        Ok(cwd.join(dir).join(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_removes_pid() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("run").join("nested");

        let pid = PidFile::create(&dir).unwrap();
        let expected = dir.join(format!("{}.pid", process::id()));
        assert_eq!(pid.path(), expected);
        assert_eq!(
            fs::read_to_string(&expected).unwrap(),
            process::id().to_string()
        );

        let removed = pid.remove().unwrap();
        assert_eq!(removed, expected);
        assert!(!expected.exists());
    }

    #[test]
    fn relative_dir_resolves_against_cwd() {
        let path = PidFile::resolve(Path::new("pids"), 42).unwrap();
        assert_eq!(path, env::current_dir().unwrap().join("pids").join("42.pid"));
    }

    #[test]
    fn remove_reports_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let pid = PidFile::create(tmp.path()).unwrap();
        fs::remove_file(pid.path()).unwrap();

        let err = pid.remove().unwrap_err();
        assert_eq!(err.as_label(), "runtime_pid_file");
    }

    #[test]
    fn create_fails_when_parent_is_a_file() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();

        let err = PidFile::create(&blocker.join("pids")).unwrap_err();
        assert!(err.is_environment());
    }
}
