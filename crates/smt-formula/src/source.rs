// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Access to expression graphs produced by an external SMT-LIB parser
//!
//! The tree builder only needs the handful of queries in [`SourceGraph`].
//! Engines typically hand out graphs where one sub-expression is referenced
//! from several parents; that sharing is expanded by the builder.

use std::hash::Hash;

/// Read-only view of an engine's expression graph
pub trait SourceGraph {
    /// Handle to one graph node. Equal handles denote the same node.
    type Node: Clone + Eq + Hash;

    /// Sort name as printed by the engine (e.g. `String`, `RegLan`)
    fn sort_of(&self, node: &Self::Node) -> String;

    /// Argument nodes, in order
    fn children_of(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Name of the declaration applied at this node
    fn declaration_name_of(&self, node: &Self::Node) -> String;

    /// True for user-declared constants (free variables)
    fn is_nullary_uninterpreted(&self, node: &Self::Node) -> bool;

    /// Literal parameters: indices of indexed operators, or the literal text
    /// of a value
    fn literal_parameters_of(&self, node: &Self::Node) -> Vec<String>;
}

/// Handle into an [`ArenaGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GraphNodeId(usize);

#[derive(Debug, Clone)]
struct ArenaNode {
    sort: String,
    name: String,
    uninterpreted: bool,
    params: Vec<String>,
    children: Vec<GraphNodeId>,
}

/// In-memory expression graph.
///
/// Handles can be reused as children of any number of later nodes, which is
/// how engines represent shared sub-expressions.
#[derive(Debug, Clone, Default)]
pub struct ArenaGraph {
    nodes: Vec<ArenaNode>,
}

impl ArenaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Declared constant `name` of sort `sort`
    pub fn variable(&mut self, name: impl Into<String>, sort: impl Into<String>) -> GraphNodeId {
        self.add(ArenaNode {
            sort: sort.into(),
            name: name.into(),
            uninterpreted: true,
            params: vec![],
            children: vec![],
        })
    }

    /// Value literal, e.g. `"a"` or `42`
    pub fn constant(&mut self, literal: impl Into<String>, sort: impl Into<String>) -> GraphNodeId {
        let literal = literal.into();
        self.add(ArenaNode {
            sort: sort.into(),
            name: literal.clone(),
            uninterpreted: false,
            params: vec![literal],
            children: vec![],
        })
    }

    /// Application of `operator` to `children`
    pub fn apply(
        &mut self,
        operator: impl Into<String>,
        sort: impl Into<String>,
        children: impl IntoIterator<Item = GraphNodeId>,
    ) -> GraphNodeId {
        self.apply_indexed(operator, Vec::<String>::new(), sort, children)
    }

    /// Application of an indexed operator `(_ operator params...)`
    pub fn apply_indexed(
        &mut self,
        operator: impl Into<String>,
        params: impl IntoIterator<Item = impl Into<String>>,
        sort: impl Into<String>,
        children: impl IntoIterator<Item = GraphNodeId>,
    ) -> GraphNodeId {
        self.add(ArenaNode {
            sort: sort.into(),
            name: operator.into(),
            uninterpreted: false,
            params: params.into_iter().map(Into::into).collect(),
            children: children.into_iter().collect(),
        })
    }

    /// Overwrite the arguments of an existing node
    pub fn set_children(&mut self, node: GraphNodeId, children: Vec<GraphNodeId>) {
        self.nodes[node.0].children = children;
    }

    fn add(&mut self, node: ArenaNode) -> GraphNodeId {
        self.nodes.push(node);
        GraphNodeId(self.nodes.len() - 1)
    }

    fn node(&self, id: &GraphNodeId) -> &ArenaNode {
        &self.nodes[id.0]
    }
}

impl SourceGraph for ArenaGraph {
    type Node = GraphNodeId;

    fn sort_of(&self, node: &GraphNodeId) -> String {
        self.node(node).sort.clone()
    }

    fn children_of(&self, node: &GraphNodeId) -> Vec<GraphNodeId> {
        self.node(node).children.clone()
    }

    fn declaration_name_of(&self, node: &GraphNodeId) -> String {
        self.node(node).name.clone()
    }

    fn is_nullary_uninterpreted(&self, node: &GraphNodeId) -> bool {
        let node = self.node(node);
        node.uninterpreted && node.children.is_empty()
    }

    fn literal_parameters_of(&self, node: &GraphNodeId) -> Vec<String> {
        self.node(node).params.clone()
    }
}
