// src/engine/mod.rs

//! Generation driver.
//!
//! - [`generator`]: the per-run state machine that assembles the graph and
//!   runs one dispatch pass per output format;
//! - [`artifacts`]: the rendered files, plus writing them out and checking
//!   them against what is on disk.

pub mod artifacts;
pub mod generator;

pub use artifacts::{Artifacts, GeneratedFile};
pub use generator::{Format, Generator, GeneratorState, RenderSettings};
