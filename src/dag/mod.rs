// src/dag/mod.rs

//! Node graph and the generic multi-target compilation core.
//!
//! - [`node`] defines [`Node`] and the embedded [`BaseNode`].
//! - [`graph`] holds the arena, edge maintenance and validation.
//! - [`walk`] contains the traversal algorithms.
//! - [`capability`] implements runtime capability checks.
//! - [`dispatch`] runs one rendering pass per output format.

pub mod capability;
pub mod dispatch;
pub mod graph;
pub mod node;
pub mod walk;

pub use capability::{Capabilities, CapabilitySet, SkipAsDependency, implements};
pub use dispatch::{OutputFormat, dispatch};
pub use graph::{Graph, NodeRef};
pub use node::{AsAny, BaseNode, Node, NodeId};
pub use walk::Depth;
