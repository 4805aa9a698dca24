// src/dag/walk.rs

//! Traversal algorithms over a [`Graph`].
//!
//! - post-order walks (dependencies first) over the whole graph or rooted at
//!   one node, optionally limited in depth;
//! - the same walks over the reverse relation (dependents first);
//! - breadth-first gathering of dependency names matching a predicate.
//!
//! Every walk tracks the active DFS path and fails with
//! [`PipegenError::DagCycle`] as soon as it steps onto a node that is still
//! on that path.

use std::collections::{HashMap, HashSet};

use crate::dag::capability::SkipAsDependency;
use crate::dag::graph::{Graph, NodeRef};
use crate::dag::node::NodeId;
use crate::errors::{PipegenError, Result};

/// How far from the starting node a traversal may go.
///
/// There is deliberately no default: every call site states what it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Immediate inputs only.
    Direct,
    /// Inputs at most `n` edges away.
    Levels(usize),
    /// The full transitive closure.
    Unbounded,
}

impl Depth {
    fn allows(self, level: usize) -> bool {
        match self {
            Depth::Direct => level <= 1,
            Depth::Levels(n) => level <= n,
            Depth::Unbounded => true,
        }
    }
}

/// Which edge list a traversal follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Towards dependencies (`inputs`).
    Inputs,
    /// Towards dependents (`outputs`).
    Outputs,
}

impl Direction {
    fn edges(self, graph: &Graph, id: NodeId) -> &[NodeId] {
        match self {
            Direction::Inputs => graph.inputs_of(id),
            Direction::Outputs => graph.outputs_of(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Active,
    Done,
}

struct Walker<'g, F> {
    graph: &'g Graph,
    direction: Direction,
    marks: HashMap<NodeId, Mark>,
    path: Vec<NodeId>,
    /// Nodes the walk may enter; `None` means the whole graph.
    scope: Option<HashSet<NodeId>>,
    visitor: F,
}

impl<'g, F> Walker<'g, F>
where
    F: FnMut(NodeRef<'g>) -> Result<()>,
{
    fn new(
        graph: &'g Graph,
        direction: Direction,
        scope: Option<HashSet<NodeId>>,
        visitor: F,
    ) -> Self {
        Self {
            graph,
            direction,
            marks: HashMap::new(),
            path: Vec::new(),
            scope,
            visitor,
        }
    }

    fn visit(&mut self, id: NodeId) -> Result<()> {
        match self.marks.get(&id) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Active) => return Err(self.cycle_at(id)),
            None => {}
        }

        self.enter(id);
        self.visit_edges(id)?;
        self.leave(id);

        (self.visitor)(self.graph.get(id))
    }

    fn visit_edges(&mut self, id: NodeId) -> Result<()> {
        for &next in self.direction.edges(self.graph, id) {
            if self.marks.get(&next) == Some(&Mark::Active) {
                return Err(self.cycle_at(next));
            }
            if self.in_scope(next) {
                self.visit(next)?;
            }
        }
        Ok(())
    }

    fn enter(&mut self, id: NodeId) {
        self.marks.insert(id, Mark::Active);
        self.path.push(id);
    }

    fn leave(&mut self, id: NodeId) {
        self.path.pop();
        self.marks.insert(id, Mark::Done);
    }

    fn in_scope(&self, id: NodeId) -> bool {
        self.scope.as_ref().is_none_or(|scope| scope.contains(&id))
    }

    fn cycle_at(&self, id: NodeId) -> PipegenError {
        let start = self.path.iter().position(|&n| n == id).unwrap_or(0);
        let names = self.path[start..]
            .iter()
            .map(|&n| self.graph.name_of(n).to_string())
            .collect();
        PipegenError::DagCycle(names)
    }
}

pub(crate) fn walk_graph<'g, F>(
    graph: &'g Graph,
    direction: Direction,
    visitor: F,
) -> Result<()>
where
    F: FnMut(NodeRef<'g>) -> Result<()>,
{
    let mut walker = Walker::new(graph, direction, None, visitor);
    for node in graph.nodes() {
        walker.visit(node.id())?;
    }
    Ok(())
}

pub(crate) fn walk_from<'g, F>(
    graph: &'g Graph,
    root: NodeId,
    direction: Direction,
    depth: Depth,
    include_root: bool,
    visitor: F,
) -> Result<()>
where
    F: FnMut(NodeRef<'g>) -> Result<()>,
{
    let scope = match depth {
        Depth::Unbounded => None,
        _ => Some(reachable(graph, root, direction, depth).into_iter().collect()),
    };

    let mut walker = Walker::new(graph, direction, scope, visitor);
    if include_root {
        walker.visit(root)
    } else {
        walker.enter(root);
        walker.visit_edges(root)
    }
}

/// Nodes reachable from `root` along `direction` within `depth`,
/// breadth-first, each node once at its shallowest level. `root` itself is
/// never included.
fn reachable(graph: &Graph, root: NodeId, direction: Direction, depth: Depth) -> Vec<NodeId> {
    let mut seen = HashSet::from([root]);
    let mut order = Vec::new();
    let mut frontier = vec![root];
    let mut level = 0;

    while !frontier.is_empty() {
        level += 1;
        if !depth.allows(level) {
            break;
        }

        let mut next = Vec::new();
        for id in frontier {
            for &edge in direction.edges(graph, id) {
                if seen.insert(edge) {
                    order.push(edge);
                    next.push(edge);
                }
            }
        }
        frontier = next;
    }

    order
}

pub(crate) fn gather_matching_input_names<P>(
    graph: &Graph,
    root: NodeId,
    predicate: P,
    depth: Depth,
) -> Vec<String>
where
    P: Fn(NodeRef<'_>) -> bool,
{
    reachable(graph, root, Direction::Inputs, depth)
        .into_iter()
        .map(|id| graph.get(id))
        .filter(|node| !node.implements::<dyn SkipAsDependency>() && predicate(*node))
        .map(|node| node.name().to_string())
        .collect()
}
