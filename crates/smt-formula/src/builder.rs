// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Construction of owned trees from an engine's expression graph
//!
//! Construction runs in two phases, neither of which recurses on the graph:
//!
//! 1. **Enumerate**: breadth-first over *occurrences*. A node referenced by two
//!    parents is visited twice and gets two ids, which is what turns sharing
//!    into duplication. Every occurrence is classified immediately and gets a
//!    slot recording its parent and the number of children still missing.
//! 2. **Resolve**: a work list of slots whose children are all built. Each one
//!    is moved into its parent's child position; a parent joins the work list
//!    once its last child arrives. The slot without a parent is the root.

use crate::analysis;
use crate::data::formula_set::FormulaSet;
use crate::data::kind::{ClassifyInput, Kind};
use crate::data::node::{ExprNode, NodeId};
use crate::data::sort::Sort;
use crate::error::{BuildError, SortDiagnostic};
use crate::options::BuildOptions;
use crate::source::SourceGraph;
use log::{debug, trace, warn};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, VecDeque};

/// Build a formula set with one assertion per root, using default options
pub fn build<G: SourceGraph>(graph: &G, roots: &[G::Node]) -> Result<FormulaSet, BuildError> {
    TreeBuilder::new(BuildOptions::default()).build(graph, roots)
}

/// Builds owned trees and keeps the sort diagnostics of everything it built
#[derive(Debug, Default)]
pub struct TreeBuilder {
    options: BuildOptions,
    diagnostics: Vec<SortDiagnostic>,
}

/// Enumeration record for one occurrence
struct Slot {
    node: Option<ExprNode>,
    /// Parent slot and position among the parent's children
    parent: Option<(usize, usize)>,
    missing: usize,
    built: Vec<Option<ExprNode>>,
}

impl TreeBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            diagnostics: Vec::new(),
        }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Nodes whose sort was degraded to unresolved
    pub fn diagnostics(&self) -> &[SortDiagnostic] {
        &self.diagnostics
    }

    /// Build a new formula set with one assertion per root.
    ///
    /// On error nothing is returned; diagnostics recorded for the failed set
    /// are discarded.
    pub fn build<G: SourceGraph>(
        &mut self,
        graph: &G,
        roots: &[G::Node],
    ) -> Result<FormulaSet, BuildError> {
        debug!("building formula set from {} assertion(s)", roots.len());
        let recorded = self.diagnostics.len();
        let result = self.build_roots(graph, roots);
        if result.is_err() {
            self.diagnostics.truncate(recorded);
        }
        let mut set = result?;
        analysis::collect_variables(&mut set);
        debug!(
            "built formula set: {} assertion(s), {} node(s)",
            set.len(),
            set.next_id
        );
        Ok(set)
    }

    /// Build the tree for `root` and append it to `set` as a new assertion.
    /// Ids continue after the ids already in `set`.
    pub fn append<G: SourceGraph>(
        &mut self,
        set: &mut FormulaSet,
        graph: &G,
        root: &G::Node,
    ) -> Result<NodeId, BuildError> {
        let recorded = self.diagnostics.len();
        let result = check_acyclic(graph, std::slice::from_ref(root))
            .and_then(|_| self.build_tree(graph, root, set.next_id, set.next_id));
        let tree = match result {
            Ok(tree) => tree,
            Err(err) => {
                self.diagnostics.truncate(recorded);
                return Err(err);
            }
        };
        let id = tree.id;
        set.push(tree)?;
        analysis::collect_variables(set);
        Ok(id)
    }

    fn build_roots<G: SourceGraph>(
        &mut self,
        graph: &G,
        roots: &[G::Node],
    ) -> Result<FormulaSet, BuildError> {
        check_acyclic(graph, roots)?;
        let mut set = FormulaSet::new();
        for root in roots {
            let tree = self.build_tree(graph, root, set.next_id, set.next_id)?;
            trace!("assertion {} built as tree rooted at {}", set.len(), tree.id);
            set.push(tree)?;
        }
        Ok(set)
    }

    /// Enumerate and resolve one root. `first_id` is the first id to hand
    /// out; `budget_used` is the number of ids already counted against
    /// `max_occurrences` for this set.
    fn build_tree<G: SourceGraph>(
        &mut self,
        graph: &G,
        root: &G::Node,
        first_id: NodeId,
        budget_used: usize,
    ) -> Result<ExprNode, BuildError> {
        let mut slots: Vec<Slot> = Vec::new();
        let mut ready: Vec<usize> = Vec::new();
        let mut queue: VecDeque<(G::Node, Option<(usize, usize)>)> = VecDeque::new();
        queue.push_back((root.clone(), None));

        while let Some((handle, parent)) = queue.pop_front() {
            let index = slots.len();
            if let Some(limit) = self.options.max_occurrences {
                if budget_used + index >= limit {
                    return Err(BuildError::OccurrenceLimitExceeded { limit });
                }
            }
            let id = first_id + index;
            let children = graph.children_of(&handle);
            let node = self.make_node(graph, &handle, &children, id);
            if children.is_empty() {
                ready.push(index);
            }
            slots.push(Slot {
                node: Some(node),
                parent,
                missing: children.len(),
                built: std::iter::repeat_with(|| None).take(children.len()).collect(),
            });
            for (position, child) in children.into_iter().enumerate() {
                queue.push_back((child, Some((index, position))));
            }
        }

        let mut result = None;
        while let Some(index) = ready.pop() {
            let slot = &mut slots[index];
            let Some(mut node) = slot.node.take() else {
                continue;
            };
            node.children = slot.built.drain(..).flatten().collect();
            let parent = slot.parent;
            match parent {
                Some((parent, position)) => {
                    let parent_slot = &mut slots[parent];
                    parent_slot.built[position] = Some(node);
                    parent_slot.missing -= 1;
                    if parent_slot.missing == 0 {
                        ready.push(parent);
                    }
                }
                None => result = Some(node),
            }
        }

        result.ok_or_else(|| BuildError::MalformedGraph {
            node: graph.declaration_name_of(root),
        })
    }

    /// Create the childless node for one occurrence and classify it
    fn make_node<G: SourceGraph>(
        &mut self,
        graph: &G,
        handle: &G::Node,
        children: &[G::Node],
        id: NodeId,
    ) -> ExprNode {
        let sort = match Sort::from_engine_name(&graph.sort_of(handle)) {
            Ok(sort) => Some(sort),
            Err(error) => {
                warn!("node {}: {}, continuing with unresolved sort", id, error);
                if self.options.record_sort_diagnostics {
                    self.diagnostics.push(SortDiagnostic { node: id, error });
                }
                None
            }
        };
        let child_sorts: Vec<Option<Sort>> = children
            .iter()
            .map(|child| Sort::from_engine_name(&graph.sort_of(child)).ok())
            .collect();
        let operator = graph.declaration_name_of(handle);
        let kind = Kind::classify(ClassifyInput {
            operator: &operator,
            is_nullary_uninterpreted: graph.is_nullary_uninterpreted(handle),
            sort,
            child_sorts: &child_sorts,
        });
        let mut literal_params = graph.literal_parameters_of(handle);
        if kind == Kind::Constant && literal_params.is_empty() {
            literal_params.push(operator.clone());
        }
        ExprNode::new(id, kind, sort, operator, literal_params)
    }
}

/// Reject graphs in which a node is reachable from itself.
///
/// Works on distinct nodes, so the cost is linear in the size of the graph
/// rather than in the size of the expanded tree.
fn check_acyclic<G: SourceGraph>(graph: &G, roots: &[G::Node]) -> Result<(), BuildError> {
    let mut dag: DiGraph<G::Node, ()> = DiGraph::new();
    let mut indices: HashMap<G::Node, NodeIndex> = HashMap::new();
    let mut stack: Vec<G::Node> = Vec::new();

    for root in roots {
        if !indices.contains_key(root) {
            indices.insert(root.clone(), dag.add_node(root.clone()));
            stack.push(root.clone());
        }
    }

    while let Some(handle) = stack.pop() {
        let from = indices[&handle];
        for child in graph.children_of(&handle) {
            let to = match indices.get(&child) {
                Some(&index) => index,
                None => {
                    let index = dag.add_node(child.clone());
                    indices.insert(child.clone(), index);
                    stack.push(child);
                    index
                }
            };
            dag.add_edge(from, to, ());
        }
    }

    toposort(&dag, None).map(|_| ()).map_err(|cycle| BuildError::MalformedGraph {
        node: graph.declaration_name_of(&dag[cycle.node_id()]),
    })
}
