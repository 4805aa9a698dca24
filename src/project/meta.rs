// src/project/meta.rs

use crate::config::ProjectFile;

/// Project-wide settings shared between nodes.
///
/// Filled while nodes are constructed: a node's constructor may register
/// build args or source files here, and nodes that depend on the complete
/// lists (the docker node) are constructed last from the final snapshot.
#[derive(Debug, Clone, Default)]
pub struct Meta {
    /// Build output directory for `local-%` exports.
    pub artifacts: String,

    /// Build args forwarded from `make` into `docker buildx build`.
    pub build_args: Vec<String>,

    /// Files that must be present in the Docker build context.
    pub source_files: Vec<String>,

    pub npm_cache_path: String,
    pub go_path: String,
}

impl Meta {
    pub fn new() -> Self {
        Self {
            artifacts: "_out".to_string(),
            npm_cache_path: "/src/node_modules".to_string(),
            go_path: "/go".to_string(),
            ..Self::default()
        }
    }

    pub fn from_project(cfg: &ProjectFile) -> Self {
        let mut meta = Self::new();
        meta.artifacts = cfg.project.artifacts.clone();
        meta.npm_cache_path = cfg.js.npm_cache_path.clone();
        for arg in &cfg.docker.build_args {
            meta.add_build_arg(arg.clone());
        }
        meta
    }

    pub fn add_build_arg(&mut self, arg: impl Into<String>) {
        let arg = arg.into();
        if !self.build_args.contains(&arg) {
            self.build_args.push(arg);
        }
    }

    pub fn add_source_file(&mut self, file: impl Into<String>) {
        let file = file.into();
        if !self.source_files.contains(&file) {
            self.source_files.push(file);
        }
    }
}
