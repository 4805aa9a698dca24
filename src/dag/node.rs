// src/dag/node.rs

//! The unit of the build-description graph.
//!
//! Concrete node types (toolchains, builds, linters, ...) embed a
//! [`BaseNode`] which carries the identity and the edge lists, and implement
//! [`Node`] to expose it. Format-specific behaviour is *not* part of this
//! trait; it is attached through capabilities (see [`crate::dag::capability`]).

use std::any::Any;
use std::fmt::Debug;

use crate::dag::capability::Capabilities;

/// Index of a node inside the [`Graph`](crate::dag::Graph) arena that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index (insertion position).
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identity and edge bookkeeping shared by every node.
///
/// `inputs` are the nodes this node depends on, `outputs` the nodes that
/// depend on it. Both lists preserve insertion order and are only ever
/// mutated by the graph, which keeps them mutually consistent.
#[derive(Debug, Clone)]
pub struct BaseNode {
    name: String,
    inputs: Vec<NodeId>,
    outputs: Vec<NodeId>,
}

impl BaseNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    /// Returns `false` if the edge was already present.
    pub(crate) fn push_input(&mut self, input: NodeId) -> bool {
        if self.inputs.contains(&input) {
            return false;
        }
        self.inputs.push(input);
        true
    }

    pub(crate) fn push_output(&mut self, output: NodeId) {
        if !self.outputs.contains(&output) {
            self.outputs.push(output);
        }
    }
}

/// Upcast helper so the graph can hand concrete node values to capability
/// casts without knowing their type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A node of the build-description graph.
pub trait Node: AsAny + Debug {
    fn base(&self) -> &BaseNode;

    fn base_mut(&mut self) -> &mut BaseNode;

    fn name(&self) -> &str {
        self.base().name()
    }

    /// Register the rendering contracts this node fulfils.
    ///
    /// Called once, when the node is added to a graph. The default registers
    /// nothing: such a node takes part in traversal and dependency gathering
    /// but never renders anything.
    fn capabilities(&self, caps: &mut Capabilities<Self>)
    where
        Self: Sized,
    {
        let _ = caps;
    }
}
