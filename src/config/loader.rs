// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{ProjectFile, RawProjectFile};
use crate::errors::Result;

/// Load a project file and return the raw, unvalidated `RawProjectFile`.
///
/// This only performs TOML deserialization. Use [`load_and_validate`] for
/// value checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawProjectFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let project: RawProjectFile = toml::from_str(&contents)?;

    Ok(project)
}

/// Parse a project description held in memory.
pub fn load_from_str(contents: &str) -> Result<ProjectFile> {
    let raw: RawProjectFile = toml::from_str(contents)?;
    ProjectFile::try_from(raw)
}

/// Load a project file from path and validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ProjectFile> {
    let raw = load_from_path(&path)?;
    let project = ProjectFile::try_from(raw)?;
    Ok(project)
}

/// Project file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "Pipegen.toml";
