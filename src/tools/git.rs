//! Git operations on the cloned site repository.

use crate::tools::process;
use anyhow::Result;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Committed {
    Pushed,
    /// The working tree was clean; nothing was committed or pushed.
    Nothing,
}

/// Stage everything, commit, and push to the default upstream.
pub fn commit_and_push(repo: &Path, message: &str) -> Result<Committed> {
    let status = process::run("git", &["status", "--porcelain"], Some(repo))?;
    if status.stdout.trim().is_empty() {
        return Ok(Committed::Nothing);
    }
    process::run("git", &["add", "-A"], Some(repo))?;
    process::run("git", &["commit", "-m", message], Some(repo))?;
    process::run("git", &["push"], Some(repo))?;
    Ok(Committed::Pushed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn clean_tree_reports_nothing_to_commit() {
        if which::which("git").is_err() {
            return;
        }
        let dir = TempDir::new().unwrap();
        process::run("git", &["init", "--quiet"], Some(dir.path())).unwrap();
        let outcome = commit_and_push(dir.path(), "noop").unwrap();
        assert_eq!(outcome, Committed::Nothing);
    }
}
