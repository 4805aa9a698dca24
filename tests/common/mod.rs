#![allow(dead_code)]

use std::io::Write;

use pipegen::dag::{Graph, NodeRef};
use pipegen_test_utils::fake_node::FakeNode;
use tempfile::NamedTempFile;

pub use pipegen_test_utils::init_tracing;

/// Build a graph from fake nodes (inserted in the given order) and
/// `(dependent, dependency)` edges.
pub fn fake_graph(nodes: Vec<FakeNode>, edges: &[(&str, &str)]) -> Graph {
    let mut graph = Graph::new();
    for node in nodes {
        graph.add(node).expect("add node");
    }
    for (dependent, dependency) in edges {
        graph.connect(dependent, dependency).expect("connect nodes");
    }
    graph
}

pub fn names<'g>(nodes: impl Iterator<Item = NodeRef<'g>>) -> Vec<&'g str> {
    nodes.map(|node| node.name()).collect()
}

/// Write a project file to a temporary location.
pub fn write_project(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    write!(file, "{contents}").expect("write project file");
    file
}
