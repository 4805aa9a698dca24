// src/errors.rs

//! Crate-wide error type.
//!
//! Node rendering code works with `anyhow` (it is "userland" from the point
//! of view of the graph core); the core wraps those failures with the node
//! name and output format before handing them to the driver.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipegenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Duplicate node name in graph: {0}")]
    DuplicateNode(String),

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Node '{0}' cannot depend on itself")]
    SelfDependency(String),

    #[error("Cycle detected in node graph involving: {}", .0.join(", "))]
    DagCycle(Vec<String>),

    #[error("Rendering {format} for node '{node}' failed: {source:#}")]
    Render {
        format: &'static str,
        node: String,
        source: anyhow::Error,
    },

    #[error("Rendering template {path:?} defined by node '{node}' failed: {source:#}")]
    Template {
        node: String,
        path: PathBuf,
        source: anyhow::Error,
    },

    #[error("{format} output {path:?} failed: {source:#}")]
    External {
        format: &'static str,
        path: PathBuf,
        source: anyhow::Error,
    },

    #[error("Generated files are out of date: {}", .0.join(", "))]
    Stale(Vec<String>),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PipegenError>;
