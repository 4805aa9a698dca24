// src/config/validate.rs

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::model::{ProjectFile, RawProjectFile};
use crate::errors::{PipegenError, Result};

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9._-]*$").expect("invalid node name pattern"));

/// Container image reference: `[registry/]repository[:tag][@digest]`.
/// Whitespace and YAML-significant characters are never valid.
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[a-zA-Z0-9][a-zA-Z0-9._-]*(:[0-9]+)?",
        r"(/[a-zA-Z0-9._-]+)*",
        r"(:[a-zA-Z0-9._-]+)?",
        r"(@[a-z0-9]+:[a-fA-F0-9]+)?$",
    ))
    .expect("invalid image reference pattern")
});

impl TryFrom<RawProjectFile> for ProjectFile {
    type Error = PipegenError;

    fn try_from(raw: RawProjectFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_project(&raw)?;
        Ok(ProjectFile::new_unchecked(raw))
    }
}

/// Value checks only. Dangling `after` references, duplicate node names and
/// cycles are left to graph assembly, which reports them with node context.
fn validate_raw_project(cfg: &RawProjectFile) -> Result<()> {
    validate_name("[project].name", &cfg.project.name)?;
    validate_build_args(cfg)?;
    validate_image_ref("[ci].image", &cfg.ci.image)?;
    validate_js(cfg)?;
    validate_protobuf(cfg)?;
    validate_builds(cfg)?;
    validate_image(cfg)?;
    Ok(())
}

fn validate_name(field: &str, name: &str) -> Result<()> {
    if !NAME_RE.is_match(name) {
        return Err(PipegenError::ConfigError(format!(
            "{field} '{name}' must start with a letter and contain only letters, digits, '.', '_' or '-'"
        )));
    }
    Ok(())
}

fn validate_image_ref(field: &str, image: &str) -> Result<()> {
    if !IMAGE_RE.is_match(image) {
        return Err(PipegenError::ConfigError(format!(
            "{field} '{image}' is not a valid container image reference"
        )));
    }
    Ok(())
}

fn validate_build_args(cfg: &RawProjectFile) -> Result<()> {
    for arg in &cfg.docker.build_args {
        if arg.is_empty() || !arg.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(PipegenError::ConfigError(format!(
                "[docker].build_args entry '{arg}' is not a valid variable name"
            )));
        }
    }
    Ok(())
}

fn validate_js(cfg: &RawProjectFile) -> Result<()> {
    let js = &cfg.js;

    if js.source_dir.is_empty() || Path::new(&js.source_dir).is_absolute() {
        return Err(PipegenError::ConfigError(format!(
            "[js].source_dir must be a relative path (got '{}')",
            js.source_dir
        )));
    }

    if !js.npm_cache_path.starts_with('/') {
        return Err(PipegenError::ConfigError(format!(
            "[js].npm_cache_path must be an absolute path (got '{}')",
            js.npm_cache_path
        )));
    }

    if let Some(image) = &js.image {
        validate_image_ref("[js].image", image)?;
    }

    if js.image.is_none() && js.version.trim().is_empty() {
        return Err(PipegenError::ConfigError(
            "[js].version must not be empty when [js].image is not set".to_string(),
        ));
    }

    Ok(())
}

fn validate_protobuf(cfg: &RawProjectFile) -> Result<()> {
    if let Some(protobuf) = &cfg.protobuf {
        if protobuf.specs.is_empty() {
            return Err(PipegenError::ConfigError(
                "[protobuf].specs must list at least one .proto file".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_builds(cfg: &RawProjectFile) -> Result<()> {
    for build in &cfg.build {
        validate_name("[[build]].name", &build.name)?;
    }
    Ok(())
}

fn validate_image(cfg: &RawProjectFile) -> Result<()> {
    if let Some(image) = &cfg.image {
        validate_name("[image].name", &image.name)?;
        if cfg.build.is_empty() {
            return Err(PipegenError::ConfigError(format!(
                "[image] '{}' needs at least one [[build]] to collect artifacts from",
                image.name
            )));
        }
    }
    Ok(())
}
