// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Ordered set of asserted root trees for one problem instance

use crate::analysis;
use crate::data::attribute::{AttributeMap, AttributeValue, VariableMap};
use crate::data::node::{ExprNode, NodeId};
use crate::error::BuildError;
use crate::render;
use std::collections::HashSet;
use std::mem;
use std::ops::Index;

/// One parsed problem instance: the top-level assertions in order, plus
/// attributes aggregated over all of them.
#[derive(Debug, Default)]
pub struct FormulaSet {
    pub(crate) roots: Vec<ExprNode>,
    pub(crate) attributes: AttributeMap,
    /// First id not yet handed out to a node of this set
    pub(crate) next_id: NodeId,
}

impl FormulaSet {
    /// Create a new empty formula set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn roots(&self) -> &[ExprNode] {
        &self.roots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExprNode> {
        self.roots.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ExprNode> {
        self.roots.get(index)
    }

    /// Mutable access to a root. Only its attribute maps can change through
    /// the attribute passes; the tree shape is fixed.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut ExprNode> {
        self.roots.get_mut(index)
    }

    /// Replace the root at `index`, returning the previous one.
    ///
    /// Fails if the new tree carries an id used by another root of this set;
    /// the set is left unchanged. Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, root: ExprNode) -> Result<ExprNode, BuildError> {
        let len = self.roots.len();
        assert!(index < len, "replacement index (is {}) should be < len (is {})", index, len);
        self.check_ids(&root, Some(index))?;
        self.observe_ids(&root);
        Ok(mem::replace(&mut self.roots[index], root))
    }

    /// Insert a root at `index`, shifting later roots.
    ///
    /// Fails if the tree carries an id already used in this set. Panics if
    /// `index > len`.
    pub fn insert(&mut self, index: usize, root: ExprNode) -> Result<(), BuildError> {
        let len = self.roots.len();
        assert!(index <= len, "insertion index (is {}) should be <= len (is {})", index, len);
        self.check_ids(&root, None)?;
        self.observe_ids(&root);
        self.roots.insert(index, root);
        Ok(())
    }

    /// Remove and return the root at `index`. Panics if out of bounds.
    pub fn remove(&mut self, index: usize) -> ExprNode {
        self.roots.remove(index)
    }

    pub fn push(&mut self, root: ExprNode) -> Result<(), BuildError> {
        self.insert(self.roots.len(), root)
    }

    /// Aggregate attributes merged over all roots
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Next id a builder appending to this set will allocate
    pub fn next_id(&self) -> NodeId {
        self.next_id
    }

    /// Total number of nodes over all roots
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(ExprNode::size).sum()
    }

    /// Recompute the variable inventory on every node and on the set
    pub fn variables(&mut self) -> VariableMap {
        analysis::collect_variables(self)
    }

    /// See [`analysis::synthesize`]
    pub fn synthesize<V, F, M>(&mut self, key: &str, neutral: V, f: F, m: M) -> V
    where
        V: Clone + Into<AttributeValue>,
        F: FnMut(&ExprNode, V) -> V,
        M: FnMut(V, V) -> V,
    {
        analysis::synthesize(self, key, neutral, f, m)
    }

    /// See [`analysis::try_synthesize`]
    pub fn try_synthesize<V, E, F, M>(&mut self, key: &str, neutral: V, f: F, m: M) -> Result<V, E>
    where
        V: Clone + Into<AttributeValue>,
        F: FnMut(&ExprNode, V) -> Result<V, E>,
        M: FnMut(V, V) -> Result<V, E>,
    {
        analysis::try_synthesize(self, key, neutral, f, m)
    }

    pub fn for_each_post_order<F: FnMut(&ExprNode)>(&self, f: F) {
        analysis::for_each_post_order(self, f)
    }

    /// SMT-LIB script for this set
    pub fn render(&self) -> String {
        render::render_script(self)
    }

    fn observe_ids(&mut self, root: &ExprNode) {
        if let Some(max) = root.iter().map(ExprNode::id).max() {
            self.next_id = self.next_id.max(max + 1);
        }
    }

    /// Reject `root` if one of its ids is already used by a root other than
    /// the one at `replacing`
    fn check_ids(&self, root: &ExprNode, replacing: Option<usize>) -> Result<(), BuildError> {
        match root.iter().map(ExprNode::id).min() {
            // fresh ids from a builder appending to this set
            Some(min) if min >= self.next_id => return Ok(()),
            None => return Ok(()),
            Some(_) => {}
        }
        let incoming: HashSet<NodeId> = root.iter().map(ExprNode::id).collect();
        let clash = self
            .roots
            .iter()
            .enumerate()
            .filter(|(position, _)| Some(*position) != replacing)
            .flat_map(|(_, tree)| tree.iter())
            .map(ExprNode::id)
            .find(|id| incoming.contains(id));
        match clash {
            Some(id) => Err(BuildError::DuplicateNodeId { id }),
            None => Ok(()),
        }
    }
}

impl Index<usize> for FormulaSet {
    type Output = ExprNode;

    fn index(&self, index: usize) -> &ExprNode {
        &self.roots[index]
    }
}

impl<'a> IntoIterator for &'a FormulaSet {
    type Item = &'a ExprNode;
    type IntoIter = std::slice::Iter<'a, ExprNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.roots.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::kind::Kind;
    use crate::data::sort::Sort;

    fn var(id: NodeId, name: &str) -> ExprNode {
        ExprNode::new(id, Kind::Variable, Some(Sort::Bool), name.to_string(), vec![])
    }

    fn names(set: &FormulaSet) -> Vec<&str> {
        set.iter().map(|n| n.operator()).collect()
    }

    #[test]
    fn test_positional_editing_preserves_order() {
        let mut set = FormulaSet::new();
        set.push(var(0, "a")).unwrap();
        set.push(var(1, "c")).unwrap();
        set.insert(1, var(2, "b")).unwrap();
        assert_eq!(names(&set), vec!["a", "b", "c"]);

        let old = set.set(0, var(3, "z")).unwrap();
        assert_eq!(old.operator(), "a");
        assert_eq!(names(&set), vec!["z", "b", "c"]);

        let removed = set.remove(1);
        assert_eq!(removed.operator(), "b");
        assert_eq!(names(&set), vec!["z", "c"]);
        assert_eq!(set.len(), 2);
        assert!(set.get(2).is_none());
    }

    #[test]
    fn test_next_id_tracks_inserted_trees() {
        let mut set = FormulaSet::new();
        assert_eq!(set.next_id(), 0);
        set.push(var(4, "a")).unwrap();
        assert_eq!(set.next_id(), 5);
        set.push(var(1, "b")).unwrap();
        assert_eq!(set.next_id(), 5);
    }

    #[test]
    fn test_colliding_ids_are_rejected() {
        let mut set = FormulaSet::new();
        set.push(var(0, "a")).unwrap();
        set.push(var(1, "b")).unwrap();

        let err = set.push(var(1, "c")).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateNodeId { id: 1 }));
        let err = set.insert(0, var(0, "c")).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateNodeId { id: 0 }));
        let err = set.set(1, var(0, "c")).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateNodeId { id: 0 }));
        assert_eq!(names(&set), vec!["a", "b"]);

        // the replaced root's own ids may be reused
        let old = set.set(1, var(1, "c")).unwrap();
        assert_eq!(old.operator(), "b");
        assert_eq!(names(&set), vec!["a", "c"]);
    }

    #[test]
    #[should_panic]
    fn test_insert_out_of_bounds_panics() {
        let mut set = FormulaSet::new();
        let _ = set.insert(1, var(0, "a"));
    }
}
