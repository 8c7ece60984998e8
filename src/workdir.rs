//! Temporary working directory for the site repository clone.

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Holds the temporary clone directory for the duration of the patch steps.
///
/// Dropping the guard restores the original working directory and removes
/// the temp dir, on success and failure paths alike.
pub struct WorkdirGuard {
    dir: TempDir,
    original: PathBuf,
}

impl WorkdirGuard {
    pub fn enter() -> Result<Self> {
        let original = env::current_dir().context("read current dir")?;
        let dir = TempDir::new().context("create temp workdir")?;
        env::set_current_dir(dir.path())
            .with_context(|| format!("enter {}", dir.path().display()))?;
        Ok(Self { dir, original })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for WorkdirGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.original);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restores_the_original_directory_on_drop() {
        let before = env::current_dir().unwrap();
        {
            let guard = WorkdirGuard::enter().unwrap();
            let inside = env::current_dir().unwrap();
            assert_eq!(
                inside.canonicalize().unwrap(),
                guard.path().canonicalize().unwrap()
            );
        }
        assert_eq!(env::current_dir().unwrap(), before);
    }
}
