// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Per-instance constraint counts handed to the benchmark catalog

use super::for_each_post_order;
use crate::data::formula_set::FormulaSet;
use crate::data::kind::{HigherOrderOp, Kind};
use crate::data::node::ExprNode;
use crate::data::sort::Sort;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// Fixed-schema constraint counts of one instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeCounts {
    pub word_equations: u64,
    pub length_constraints: u64,
    pub regex_constraints: u64,
    /// One entry per registered operator, zero when absent
    pub higher_order: BTreeMap<HigherOrderOp, u64>,
}

impl Default for ProbeCounts {
    fn default() -> Self {
        Self {
            word_equations: 0,
            length_constraints: 0,
            regex_constraints: 0,
            higher_order: HigherOrderOp::ALL.iter().map(|op| (*op, 0)).collect(),
        }
    }
}

impl ProbeCounts {
    pub fn higher_order_count(&self, op: HigherOrderOp) -> u64 {
        self.higher_order.get(&op).copied().unwrap_or(0)
    }
}

/// Count constraints over all nodes.
///
/// Regex memberships and higher-order functions are counted by kind. Word
/// equations and length constraints are counted by shape, so a Bool-sorted
/// higher-order function such as `(str.prefixof x y)` also counts as a word
/// equation, matching the catalog columns filled by earlier probing runs.
pub fn probe(set: &FormulaSet) -> ProbeCounts {
    let mut counts = ProbeCounts::default();
    for_each_post_order(set, |node| {
        match node.kind() {
            Kind::RegexConstraint => counts.regex_constraints += 1,
            Kind::HigherOrderFunction => {
                if let Some(op) = HigherOrderOp::from_operator(node.operator()) {
                    *counts.higher_order.entry(op).or_default() += 1;
                }
            }
            _ => {}
        }
        let child_sorts: Vec<Option<Sort>> = node.children().iter().map(ExprNode::sort).collect();
        match Kind::binary_predicate(node.sort(), &child_sorts) {
            Some(Kind::WordEquation) => counts.word_equations += 1,
            Some(Kind::LengthConstraint) => counts.length_constraints += 1,
            _ => {}
        }
    });
    counts
}

/// Raw text of one benchmark instance, identified by its content hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    pub content: String,
    /// Lower-case hex SHA-256 of `content`
    pub hash: String,
}

impl Instance {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let hash = format!("{:x}", Sha256::digest(content.as_bytes()));
        Self {
            name: name.into(),
            content,
            hash,
        }
    }

    pub fn read(name: impl Into<String>, path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read instance {}", path.display()))?;
        Ok(Self::new(name, content))
    }
}

/// What the catalog stores for one analyzed instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRecord {
    pub instance: String,
    pub hash: String,
    pub counts: ProbeCounts,
}

impl ProbeRecord {
    pub fn new(instance: &Instance, set: &FormulaSet) -> Self {
        Self {
            instance: instance.name.clone(),
            hash: instance.hash.clone(),
            counts: probe(set),
        }
    }
}
