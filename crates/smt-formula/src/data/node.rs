// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Owned expression tree node
//!
//! Trees built from benchmark files can be arbitrarily deep (long right-nested
//! concatenations are common), so nothing in here recurses on the tree:
//! traversal, comparison and drop all run on an explicit stack.

use crate::data::attribute::{AttributeMap, AttributeValue};
use crate::data::kind::Kind;
use crate::data::sort::Sort;
use std::fmt;
use std::mem;

/// Node identifier, unique within one formula set
pub type NodeId = usize;

/// One node of an owned expression tree.
///
/// Every child is exclusively owned by its parent. Shared sub-expressions of
/// the source graph appear as separate copies with their own ids.
pub struct ExprNode {
    pub(crate) id: NodeId,
    pub(crate) kind: Kind,
    pub(crate) sort: Option<Sort>,
    pub(crate) operator: String,
    pub(crate) literal_params: Vec<String>,
    pub(crate) children: Vec<ExprNode>,
    pub(crate) attributes: AttributeMap,
}

impl ExprNode {
    pub(crate) fn new(
        id: NodeId,
        kind: Kind,
        sort: Option<Sort>,
        operator: String,
        literal_params: Vec<String>,
    ) -> Self {
        Self {
            id,
            kind,
            sort,
            operator,
            literal_params,
            children: Vec::new(),
            attributes: AttributeMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Sort of the node, `None` if the engine reported a sort outside the supported set
    pub fn sort(&self) -> Option<Sort> {
        self.sort
    }

    /// Declaration name of the operator (or of the variable)
    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// Literal parameters of an indexed operator, or the literal text of a constant
    pub fn literal_params(&self) -> &[String] {
        &self.literal_params
    }

    pub fn children(&self) -> &[ExprNode] {
        &self.children
    }

    pub fn is_variable(&self) -> bool {
        self.kind == Kind::Variable
    }

    pub fn is_constant(&self) -> bool {
        self.kind == Kind::Constant
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Get references to all nodes (including itself) in pre-order
    pub fn iter(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }

    /// Number of nodes in this tree
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    /// Visit every node after all of its children, left to right
    pub fn for_each_post_order<F: FnMut(&ExprNode)>(&self, mut f: F) {
        let mut stack: Vec<(&ExprNode, usize)> = vec![(self, 0)];
        while let Some((node, next)) = stack.pop() {
            if let Some(child) = node.children.get(next) {
                stack.push((node, next + 1));
                stack.push((child, 0));
            } else {
                f(node);
            }
        }
    }

    /// Content equality: operator, sort, literal parameters and children.
    /// Ids, kinds and attributes are not compared.
    pub fn structurally_eq(&self, other: &ExprNode) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.operator != b.operator
                || a.sort != b.sort
                || a.literal_params != b.literal_params
                || a.children.len() != b.children.len()
            {
                return false;
            }
            stack.extend(a.children.iter().zip(b.children.iter()));
        }
        true
    }

    /// Remove `key` from this node and every descendant
    pub(crate) fn clear_attribute(&mut self, key: &str) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.attributes.remove(key);
            stack.extend(node.children.iter_mut());
        }
    }
}

impl Drop for ExprNode {
    fn drop(&mut self) {
        // Unlink children iteratively so deep trees do not overflow the stack.
        let mut pending = mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl fmt::Debug for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprNode")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("sort", &self.sort)
            .field("operator", &self.operator)
            .field("literal_params", &self.literal_params)
            .field(
                "children",
                &self.children.iter().map(|c| c.id).collect::<Vec<_>>(),
            )
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Pre-order iterator over a tree
pub struct Preorder<'a> {
    stack: Vec<&'a ExprNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a ExprNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
