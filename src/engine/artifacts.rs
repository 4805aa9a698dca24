// src/engine/artifacts.rs

use std::path::{Path, PathBuf};

use anyhow::anyhow;
use tracing::{debug, info, warn};

use crate::errors::{PipegenError, Result};
use crate::fs::FileSystem;

/// One fully rendered output file, path relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    pub fn fingerprint(&self) -> blake3::Hash {
        blake3::hash(self.contents.as_bytes())
    }

    /// Whether `root/path` on `fs` holds exactly these contents.
    fn matches_disk(&self, fs: &dyn FileSystem, root: &Path) -> bool {
        let target = root.join(&self.path);
        if !fs.is_file(&target) {
            return false;
        }
        match fs.read(&target) {
            Ok(bytes) => blake3::hash(&bytes) == self.fingerprint(),
            Err(err) => {
                debug!(path = ?target, error = %err, "unable to read existing file");
                false
            }
        }
    }
}

/// Every file produced by one generation run, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    files: Vec<GeneratedFile>,
}

impl Artifacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file produced by `format`. Two formats may not claim one path.
    pub fn push(&mut self, format: &'static str, file: GeneratedFile) -> Result<()> {
        if self.get(&file.path).is_some() {
            return Err(PipegenError::External {
                format,
                path: file.path,
                source: anyhow!("path is already produced by another output"),
            });
        }
        self.files.push(file);
        Ok(())
    }

    pub fn files(&self) -> &[GeneratedFile] {
        &self.files
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&GeneratedFile> {
        let path = path.as_ref();
        self.files.iter().find(|f| f.path == path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write every file under `root`, skipping files whose contents are
    /// already up to date. Returns the number of files written.
    ///
    /// Files are written in order and the first failed write stops the
    /// run. Files written before the failure keep their new contents; a
    /// rerun only rewrites what is still out of date.
    pub fn write_all(&self, fs: &dyn FileSystem, root: &Path) -> Result<usize> {
        let mut written = 0;
        for file in &self.files {
            if file.matches_disk(fs, root) {
                debug!(path = ?file.path, "file is up to date; not rewriting");
                continue;
            }

            let target = root.join(&file.path);
            fs.write(&target, file.contents.as_bytes())
                .map_err(|source| PipegenError::External {
                    format: "filesystem",
                    path: target.clone(),
                    source,
                })?;
            debug!(path = ?target, bytes = file.contents.len(), "wrote generated file");
            written += 1;
        }

        info!(written, total = self.files.len(), root = ?root, "generated files written");
        Ok(written)
    }

    /// Paths (relative to `root`) of files that are missing on disk or
    /// differ from what this run generated.
    pub fn stale(&self, fs: &dyn FileSystem, root: &Path) -> Vec<PathBuf> {
        let stale: Vec<PathBuf> = self
            .files
            .iter()
            .filter(|file| !file.matches_disk(fs, root))
            .map(|file| file.path.clone())
            .collect();

        for path in &stale {
            warn!(path = ?path, "generated file is out of date");
        }
        stale
    }
}
