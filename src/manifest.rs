//! Idempotent patching of the platform manifest file.
//!
//! The manifest is a small `key: block` file at the root of the site
//! repository. Patching is structural and additive-only: a top-level key is
//! recognized when a line starts with `name:` at column zero, existing
//! blocks are never rewritten or removed, and detection does not validate
//! nested field values. Re-running against a manually edited file with a
//! malformed block will not repair it.

use crate::console;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "platform.yml";

const API_VERSION_KEY: &str = "api_version";
const API_VERSION_LINE: &str = "api_version: 1";
const SEARCH_KEY: &str = "search";
const SEARCH_BLOCK: &str = "search:\n  solr:\n    version: 8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Changed,
    Unchanged,
}

#[derive(Debug)]
pub struct ManifestDoc {
    path: PathBuf,
    original: String,
    text: String,
}

impl ManifestDoc {
    /// Read the manifest at `path`; a missing file loads as an empty document.
    pub fn load(path: &Path) -> Result<Self> {
        let text = if path.is_file() {
            fs::read_to_string(path)
                .with_context(|| format!("read manifest {}", path.display()))?
        } else {
            String::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            original: text.clone(),
            text,
        })
    }

    pub fn has_top_level_key(&self, key: &str) -> bool {
        self.text.lines().any(|line| {
            line.strip_prefix(key)
                .is_some_and(|rest| rest.starts_with(':'))
        })
    }

    /// Insert the version marker as the first line when absent.
    pub fn ensure_api_version(&mut self) -> PatchOutcome {
        if self.has_top_level_key(API_VERSION_KEY) {
            return PatchOutcome::Unchanged;
        }
        self.text = format!("{API_VERSION_LINE}\n\n{}", self.text);
        PatchOutcome::Changed
    }

    /// Append the canonical search block when no top-level `search` key exists.
    ///
    /// An existing key is trusted as-is; its contents are not verified.
    pub fn ensure_search_block(&mut self) -> PatchOutcome {
        if self.has_top_level_key(SEARCH_KEY) {
            console::warning(&format!(
                "{} already has a search block; leaving it untouched",
                self.path.display()
            ));
            return PatchOutcome::Unchanged;
        }
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        if !self.text.is_empty() && !self.text.ends_with("\n\n") {
            self.text.push('\n');
        }
        self.text.push_str(SEARCH_BLOCK);
        self.text.push('\n');
        PatchOutcome::Changed
    }

    /// Write the document back atomically (temp file, then rename).
    ///
    /// Reports `Unchanged` without touching the filesystem when the document
    /// is byte-identical to what was loaded.
    pub fn save(&self) -> Result<PatchOutcome> {
        if self.text == self.original {
            return Ok(PatchOutcome::Unchanged);
        }
        let file_name = self
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("manifest");
        let tmp_path = self
            .path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!(".{file_name}.tmp"));
        fs::write(&tmp_path, &self.text)
            .with_context(|| format!("write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(PatchOutcome::Changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CANONICAL: &str = "api_version: 1\n\nsearch:\n  solr:\n    version: 8\n";

    fn manifest_in(dir: &TempDir) -> PathBuf {
        dir.path().join(MANIFEST_FILE)
    }

    #[test]
    fn empty_document_becomes_canonical_file() {
        let dir = TempDir::new().unwrap();
        let path = manifest_in(&dir);
        let mut doc = ManifestDoc::load(&path).unwrap();
        assert_eq!(doc.ensure_api_version(), PatchOutcome::Changed);
        assert_eq!(doc.ensure_search_block(), PatchOutcome::Changed);
        assert_eq!(doc.save().unwrap(), PatchOutcome::Changed);
        assert_eq!(fs::read_to_string(&path).unwrap(), CANONICAL);
    }

    #[test]
    fn unrelated_content_is_preserved() {
        let dir = TempDir::new().unwrap();
        let path = manifest_in(&dir);
        fs::write(&path, "foo: bar\n").unwrap();
        let mut doc = ManifestDoc::load(&path).unwrap();
        doc.ensure_api_version();
        doc.ensure_search_block();
        doc.save().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "api_version: 1\n\nfoo: bar\n\nsearch:\n  solr:\n    version: 8\n"
        );
    }

    #[test]
    fn ensure_api_version_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut doc = ManifestDoc::load(&manifest_in(&dir)).unwrap();
        doc.ensure_api_version();
        let once = doc.text.clone();
        assert_eq!(doc.ensure_api_version(), PatchOutcome::Unchanged);
        assert_eq!(doc.text, once);
    }

    #[test]
    fn ensure_search_block_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut doc = ManifestDoc::load(&manifest_in(&dir)).unwrap();
        doc.ensure_search_block();
        let once = doc.text.clone();
        assert_eq!(doc.ensure_search_block(), PatchOutcome::Unchanged);
        assert_eq!(doc.text, once);
    }

    #[test]
    fn existing_search_key_is_left_byte_identical() {
        let dir = TempDir::new().unwrap();
        let path = manifest_in(&dir);
        let existing = "api_version: 1\n\nsearch:\n  solr:\n    version: 3\n";
        fs::write(&path, existing).unwrap();
        let mut doc = ManifestDoc::load(&path).unwrap();
        assert_eq!(doc.ensure_api_version(), PatchOutcome::Unchanged);
        assert_eq!(doc.ensure_search_block(), PatchOutcome::Unchanged);
        assert_eq!(doc.save().unwrap(), PatchOutcome::Unchanged);
        assert_eq!(fs::read_to_string(&path).unwrap(), existing);
    }

    #[test]
    fn indented_or_prefixed_keys_do_not_count() {
        let dir = TempDir::new().unwrap();
        let path = manifest_in(&dir);
        fs::write(&path, "  search:\n    solr: 8\nsearch_extra: yes\n").unwrap();
        let doc = ManifestDoc::load(&path).unwrap();
        assert!(!doc.has_top_level_key("search"));
        assert!(doc.has_top_level_key("search_extra"));
    }

    #[test]
    fn document_without_trailing_newline_gets_one_blank_separator() {
        let dir = TempDir::new().unwrap();
        let path = manifest_in(&dir);
        fs::write(&path, "foo: bar").unwrap();
        let mut doc = ManifestDoc::load(&path).unwrap();
        doc.ensure_search_block();
        assert_eq!(doc.text, "foo: bar\n\nsearch:\n  solr:\n    version: 8\n");
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = TempDir::new().unwrap();
        let path = manifest_in(&dir);
        let mut doc = ManifestDoc::load(&path).unwrap();
        doc.ensure_api_version();
        doc.ensure_search_block();
        doc.save().unwrap();
        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![MANIFEST_FILE]);
    }
}
