// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use proptest::prelude::*;
use proptest::sample::Index;
use smt_formula::analysis::{count_nodes, VARIABLES};
use smt_formula::{build, ArenaGraph, BuildError, BuildOptions, GraphNodeId, TreeBuilder};
use std::collections::HashSet;

/// Each entry lists the arguments of one graph node as picks among the nodes
/// created before it, so the graph is acyclic by construction.
fn dag_shape() -> impl Strategy<Value = Vec<Vec<Index>>> {
    prop::collection::vec(prop::collection::vec(any::<Index>(), 0..3), 1..12)
}

struct Dag {
    graph: ArenaGraph,
    nodes: Vec<GraphNodeId>,
    children: Vec<Vec<usize>>,
}

fn make_dag(shape: &[Vec<Index>]) -> Dag {
    let mut graph = ArenaGraph::new();
    let mut nodes = vec![];
    let mut children = vec![];
    for (i, picks) in shape.iter().enumerate() {
        let args: Vec<usize> = if i == 0 {
            vec![]
        } else {
            picks.iter().map(|p| p.index(i)).collect()
        };
        let node = if args.is_empty() {
            graph.variable(format!("v{}", i), "String")
        } else {
            graph.apply("str.++", "String", args.iter().map(|a| nodes[*a]))
        };
        nodes.push(node);
        children.push(args);
    }
    Dag {
        graph,
        nodes,
        children,
    }
}

/// Number of root-to-node paths, summed over all nodes
fn occurrences(dag: &Dag) -> usize {
    let mut paths = vec![0usize; dag.nodes.len()];
    let last = dag.nodes.len() - 1;
    paths[last] = 1;
    for i in (0..dag.nodes.len()).rev() {
        for c in &dag.children[i] {
            paths[*c] += paths[i];
        }
    }
    paths.iter().sum()
}

proptest! {
    #[test]
    fn every_occurrence_gets_its_own_id(shape in dag_shape()) {
        let dag = make_dag(&shape);
        let root = dag.nodes[dag.nodes.len() - 1];
        let mut set = build(&dag.graph, &[root]).unwrap();

        let expected = occurrences(&dag);
        prop_assert_eq!(set.node_count(), expected);
        prop_assert_eq!(count_nodes(&mut set), expected as u64);

        let ids: HashSet<_> = set[0].iter().map(|n| n.id()).collect();
        prop_assert_eq!(ids.len(), expected);
        prop_assert!(ids.iter().all(|id| *id < expected));
        prop_assert_eq!(set.next_id(), expected);
    }

    #[test]
    fn variable_inventory_is_stable(shape in dag_shape()) {
        let dag = make_dag(&shape);
        let root = dag.nodes[dag.nodes.len() - 1];
        let mut set = build(&dag.graph, &[root]).unwrap();

        let before = set.attribute(VARIABLES).cloned();
        let again = set.variables();
        prop_assert_eq!(before.as_ref().and_then(|v| v.as_variables()), Some(&again));
        prop_assert_eq!(set.render(), build(&dag.graph, &[root]).unwrap().render());
    }

    #[test]
    fn occurrence_limit_is_enforced(shape in dag_shape(), limit in 1usize..64) {
        let dag = make_dag(&shape);
        let root = dag.nodes[dag.nodes.len() - 1];
        let options = BuildOptions {
            max_occurrences: Some(limit),
            ..BuildOptions::default()
        };
        let result = TreeBuilder::new(options).build(&dag.graph, &[root]);
        if occurrences(&dag) > limit {
            let limited = matches!(result, Err(BuildError::OccurrenceLimitExceeded { .. }));
            prop_assert!(limited, "expected the occurrence limit of {} to be hit", limit);
        } else {
            prop_assert!(result.is_ok());
        }
    }
}
