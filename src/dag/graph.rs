// src/dag/graph.rs

use std::fmt;

use indexmap::IndexMap;
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use crate::dag::capability::{Capabilities, CapabilitySet};
use crate::dag::node::{AsAny, Node, NodeId};
use crate::dag::walk::{self, Depth, Direction};
use crate::errors::{PipegenError, Result};

struct Slot {
    node: Box<dyn Node>,
    capabilities: CapabilitySet,
}

/// Arena of nodes indexed by name.
///
/// Iteration order is insertion order everywhere, which is what makes the
/// generated artifacts reproducible. Edges are added during assembly and the
/// graph is read-only once a generation pass starts (all traversal APIs take
/// `&self`).
#[derive(Default)]
pub struct Graph {
    slots: Vec<Slot>,
    index: IndexMap<String, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and register its capabilities.
    ///
    /// Fails with [`PipegenError::DuplicateNode`] if a node with the same name
    /// is already present.
    pub fn add<N: Node>(&mut self, node: N) -> Result<NodeId> {
        let name = node.name().to_string();
        if name.is_empty() {
            return Err(PipegenError::ConfigError(
                "node name must not be empty".to_string(),
            ));
        }
        if self.index.contains_key(&name) {
            return Err(PipegenError::DuplicateNode(name));
        }

        let mut caps = Capabilities::new();
        node.capabilities(&mut caps);
        let capabilities = caps.into_set();

        let id = NodeId(self.slots.len());
        debug!(node = %name, capabilities = ?capabilities, "adding node to graph");

        self.slots.push(Slot {
            node: Box::new(node),
            capabilities,
        });
        self.index.insert(name, id);
        Ok(id)
    }

    /// Register `inputs` as dependencies of `node`.
    ///
    /// Re-adding an existing edge is a no-op. The inverse `outputs` list of
    /// each input is updated together with the dependent's `inputs`.
    pub fn add_input(&mut self, node: NodeId, inputs: &[NodeId]) -> Result<()> {
        self.check_id(node);
        for &input in inputs {
            self.check_id(input);
            if input == node {
                return Err(PipegenError::SelfDependency(self.name_of(node).to_string()));
            }
            if self.slots[node.0].node.base_mut().push_input(input) {
                self.slots[input.0].node.base_mut().push_output(node);
            }
        }
        Ok(())
    }

    /// Name-based variant of [`Graph::add_input`].
    pub fn connect(&mut self, dependent: &str, dependency: &str) -> Result<()> {
        let node = self
            .lookup(dependent)
            .ok_or_else(|| PipegenError::UnknownNode(dependent.to_string()))?;
        let input = self
            .lookup(dependency)
            .ok_or_else(|| PipegenError::UnknownNode(dependency.to_string()))?;
        self.add_input(node, &[input])
    }

    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn find(&self, name: &str) -> Option<NodeRef<'_>> {
        self.lookup(name).map(|id| self.get(id))
    }

    /// Panics if `id` was not issued by this graph.
    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        self.check_id(id);
        NodeRef { graph: self, id }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        (0..self.slots.len()).map(move |i| NodeRef {
            graph: self,
            id: NodeId(i),
        })
    }

    /// Check that the graph admits a topological order.
    ///
    /// Reports every member of the first strongly connected component found,
    /// in insertion order.
    pub fn validate(&self) -> Result<()> {
        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();

        for i in 0..self.slots.len() {
            graph.add_node(i);
        }
        for (i, slot) in self.slots.iter().enumerate() {
            for input in slot.node.base().inputs() {
                graph.add_edge(input.0, i, ());
            }
        }

        for mut component in tarjan_scc(&graph) {
            if component.len() > 1 {
                component.sort_unstable();
                let names = component
                    .into_iter()
                    .map(|i| self.name_of(NodeId(i)).to_string())
                    .collect();
                return Err(PipegenError::DagCycle(names));
            }
        }

        Ok(())
    }

    /// Deterministic post-order walk over the whole graph: every node is
    /// visited once, after all of its inputs. Independent subtrees are
    /// visited in insertion order.
    pub fn walk<'g, F>(&'g self, visitor: F) -> Result<()>
    where
        F: FnMut(NodeRef<'g>) -> Result<()>,
    {
        walk::walk_graph(self, Direction::Inputs, visitor)
    }

    /// Reverse of [`Graph::walk`]: every node is visited once, after all of
    /// its dependents. Ties are still broken by insertion order.
    pub fn walk_reverse<'g, F>(&'g self, visitor: F) -> Result<()>
    where
        F: FnMut(NodeRef<'g>) -> Result<()>,
    {
        walk::walk_graph(self, Direction::Outputs, visitor)
    }

    /// Node names in the order [`Graph::walk`] visits them.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        let mut order = Vec::with_capacity(self.len());
        self.walk(|node| {
            order.push(node.name().to_string());
            Ok(())
        })?;
        Ok(order)
    }

    pub(crate) fn inputs_of(&self, id: NodeId) -> &[NodeId] {
        self.slots[id.0].node.base().inputs()
    }

    pub(crate) fn outputs_of(&self, id: NodeId) -> &[NodeId] {
        self.slots[id.0].node.base().outputs()
    }

    pub(crate) fn name_of(&self, id: NodeId) -> &str {
        self.slots[id.0].node.name()
    }

    fn check_id(&self, id: NodeId) {
        assert!(
            id.0 < self.slots.len(),
            "node id {id:?} does not belong to this graph"
        );
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.slots.iter().map(|slot| (slot.node.name(), &slot.capabilities)))
            .finish()
    }
}

/// Read-only view of one node inside its graph.
///
/// This is what traversal callbacks and rendering calls receive; it gives
/// access to the node's name, edges and capabilities and to the traversal
/// helpers rooted at the node.
#[derive(Clone, Copy)]
pub struct NodeRef<'g> {
    graph: &'g Graph,
    id: NodeId,
}

impl<'g> NodeRef<'g> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &'g str {
        self.graph.name_of(self.id)
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn node(&self) -> &'g (dyn Node + 'static) {
        self.slot().node.as_ref()
    }

    /// Concrete node value, if it is an `N`.
    pub fn downcast<N: Node>(&self) -> Option<&'g N> {
        AsAny::as_any(self.node()).downcast_ref::<N>()
    }

    /// The node viewed as capability `C`, if it registered one.
    pub fn capability<C: ?Sized + 'static>(&self) -> Option<&'g C> {
        self.slot().capabilities.get::<C>(AsAny::as_any(self.node()))
    }

    pub fn implements<C: ?Sized + 'static>(&self) -> bool {
        self.slot().capabilities.contains::<C>()
    }

    pub fn capability_names(&self) -> &'g [&'static str] {
        self.slot().capabilities.names()
    }

    pub fn inputs(self) -> impl Iterator<Item = NodeRef<'g>> {
        let graph = self.graph;
        self.node()
            .base()
            .inputs()
            .iter()
            .map(move |&id| NodeRef { graph, id })
    }

    pub fn outputs(self) -> impl Iterator<Item = NodeRef<'g>> {
        let graph = self.graph;
        self.node()
            .base()
            .outputs()
            .iter()
            .map(move |&id| NodeRef { graph, id })
    }

    /// Post-order walk over this node's inputs (within `depth`), then the
    /// node itself.
    pub fn walk_node<F>(&self, depth: Depth, visitor: F) -> Result<()>
    where
        F: FnMut(NodeRef<'g>) -> Result<()>,
    {
        walk::walk_from(self.graph, self.id, Direction::Inputs, depth, true, visitor)
    }

    /// Post-order walk over this node's inputs only (within `depth`).
    pub fn walk_inputs<F>(&self, depth: Depth, visitor: F) -> Result<()>
    where
        F: FnMut(NodeRef<'g>) -> Result<()>,
    {
        walk::walk_from(self.graph, self.id, Direction::Inputs, depth, false, visitor)
    }

    /// Walk over the nodes depending on this one (within `depth`), each
    /// visited after its own dependents. The node itself is not visited.
    pub fn walk_outputs<F>(&self, depth: Depth, visitor: F) -> Result<()>
    where
        F: FnMut(NodeRef<'g>) -> Result<()>,
    {
        walk::walk_from(self.graph, self.id, Direction::Outputs, depth, false, visitor)
    }

    /// Names of nodes reachable through inputs (within `depth`) that satisfy
    /// `predicate`, nearest first and deduplicated. Nodes implementing
    /// [`SkipAsDependency`](crate::dag::SkipAsDependency) are never listed.
    pub fn gather_matching_input_names<P>(&self, predicate: P, depth: Depth) -> Vec<String>
    where
        P: Fn(NodeRef<'_>) -> bool,
    {
        walk::gather_matching_input_names(self.graph, self.id, predicate, depth)
    }

    fn slot(&self) -> &'g Slot {
        &self.graph.slots[self.id.0]
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}
