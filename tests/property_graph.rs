// tests/property_graph.rs

use std::collections::{BTreeSet, HashMap};

use pipegen::dag::{Depth, Graph, NodeId, dispatch, implements};
use pipegen::errors::PipegenError;
use pipegen::output::{ci, makefile};
use pipegen_test_utils::fake_node::FakeNode;
use proptest::prelude::*;

// Random DAG: node i may only depend on nodes 0..i, which keeps it acyclic.
// Nodes are inserted in reverse index order so insertion order and
// dependency order disagree.
fn dag_strategy(max_nodes: usize) -> impl Strategy<Value = Vec<BTreeSet<usize>>> {
    (1..=max_nodes).prop_flat_map(|num_nodes| {
        proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_nodes),
            num_nodes,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, deps)| {
                    if i == 0 {
                        BTreeSet::new()
                    } else {
                        deps.into_iter().map(|d| d % i).collect()
                    }
                })
                .collect()
        })
    })
}

fn node_name(i: usize) -> String {
    format!("n{i}")
}

fn build_graph(deps: &[BTreeSet<usize>]) -> (Graph, HashMap<usize, NodeId>) {
    let mut graph = Graph::new();
    let mut ids = HashMap::new();
    for i in (0..deps.len()).rev() {
        let node = if i % 3 == 0 {
            FakeNode::new(&node_name(i)).makefile()
        } else {
            FakeNode::full(&node_name(i))
        };
        ids.insert(i, graph.add(node).unwrap());
    }
    for (i, inputs) in deps.iter().enumerate() {
        let inputs: Vec<NodeId> = inputs.iter().map(|d| ids[d]).collect();
        graph.add_input(ids[&i], &inputs).unwrap();
    }
    (graph, ids)
}

proptest! {
    #[test]
    fn walk_order_is_topological(deps in dag_strategy(12)) {
        let (graph, _) = build_graph(&deps);
        prop_assert!(graph.validate().is_ok());

        let order = graph.topological_order().unwrap();
        prop_assert_eq!(order.len(), deps.len());

        let position: HashMap<&str, usize> =
            order.iter().enumerate().map(|(p, n)| (n.as_str(), p)).collect();
        for (i, inputs) in deps.iter().enumerate() {
            for d in inputs {
                prop_assert!(position[node_name(*d).as_str()] < position[node_name(i).as_str()]);
            }
        }
    }

    #[test]
    fn generation_is_deterministic(deps in dag_strategy(12)) {
        let (first, _) = build_graph(&deps);
        let (second, _) = build_graph(&deps);

        prop_assert_eq!(first.topological_order().unwrap(), second.topological_order().unwrap());

        let a = makefile::render(&dispatch::<makefile::Output>(&first).unwrap());
        let b = makefile::render(&dispatch::<makefile::Output>(&second).unwrap());
        prop_assert_eq!(a, b);

        let pipeline = ci::Pipeline { name: "p", image: "alpine" };
        let a = ci::render(&dispatch::<ci::Output>(&first).unwrap(), &pipeline).unwrap();
        let b = ci::render(&dispatch::<ci::Output>(&second).unwrap(), &pipeline).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn gathered_names_are_unique_reachable_inputs(deps in dag_strategy(12)) {
        let (graph, ids) = build_graph(&deps);

        for (i, id) in &ids {
            let node = graph.get(*id);
            let gathered =
                node.gather_matching_input_names(implements::<dyn ci::Compiler>(), Depth::Unbounded);

            let unique: BTreeSet<&String> = gathered.iter().collect();
            prop_assert_eq!(unique.len(), gathered.len());
            prop_assert!(!gathered.contains(&node_name(*i)));

            for name in &gathered {
                let found = graph.find(name).unwrap();
                prop_assert!(found.implements::<dyn ci::Compiler>());
            }

            let direct =
                node.gather_matching_input_names(implements::<dyn ci::Compiler>(), Depth::Direct);
            for name in &direct {
                prop_assert!(gathered.contains(name));
            }
        }
    }

    #[test]
    fn reversing_an_edge_creates_a_detected_cycle(deps in dag_strategy(12), pick in any::<usize>()) {
        let edges: Vec<(usize, usize)> = deps
            .iter()
            .enumerate()
            .flat_map(|(i, inputs)| inputs.iter().map(move |d| (i, *d)))
            .collect();
        prop_assume!(!edges.is_empty());

        let (mut graph, ids) = build_graph(&deps);
        let (dependent, dependency) = edges[pick % edges.len()];
        graph.add_input(ids[&dependency], &[ids[&dependent]]).unwrap();

        match graph.validate() {
            Err(PipegenError::DagCycle(names)) => {
                prop_assert!(names.contains(&node_name(dependent)));
                prop_assert!(names.contains(&node_name(dependency)));
            }
            other => prop_assert!(false, "expected DagCycle, got {:?}", other),
        }
        prop_assert!(graph.topological_order().is_err());
        prop_assert!(dispatch::<makefile::Output>(&graph).is_err());
    }
}
