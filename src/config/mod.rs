// src/config/mod.rs

//! Project description loading and validation.
//!
//! - TOML data model (`model.rs`),
//! - loading from disk (`loader.rs`),
//! - value checks turning a `RawProjectFile` into a `ProjectFile`
//!   (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_CONFIG_FILE, load_and_validate, load_from_path, load_from_str};
pub use model::{
    BuildSection, CiSection, DockerSection, ImageSection, JsSection, ProjectFile, ProjectSection,
    ProtobufSection, RawProjectFile,
};
