// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Structural counts expressed as attribute folds

use super::synthesize;
use crate::data::attribute::OperatorHistogram;
use crate::data::formula_set::FormulaSet;
use crate::data::kind::Kind;

pub const OPERATOR_HISTOGRAM: &str = "operator_histogram";
pub const NODE_COUNT: &str = "node_count";
pub const DEPTH: &str = "depth";
pub const USES_REGEX: &str = "uses_regex";

/// Occurrences of every operator applied to at least one argument
pub fn operator_histogram(set: &mut FormulaSet) -> OperatorHistogram {
    synthesize(
        set,
        OPERATOR_HISTOGRAM,
        OperatorHistogram::new(),
        |node, mut hist| {
            if !node.children().is_empty() {
                *hist.entry(node.operator().to_string()).or_default() += 1;
            }
            hist
        },
        |mut into, from| {
            for (op, count) in from {
                *into.entry(op).or_default() += count;
            }
            into
        },
    )
}

pub fn count_nodes(set: &mut FormulaSet) -> u64 {
    synthesize(set, NODE_COUNT, 0u64, |_, below| below + 1, |a, b| a + b)
}

/// Height of each subtree, a leaf having depth 1. The set aggregate is the
/// deepest assertion.
pub fn tree_depth(set: &mut FormulaSet) -> u64 {
    synthesize(set, DEPTH, 0u64, |_, deepest_child| deepest_child + 1, u64::max)
}

/// Whether a subtree contains a regular-membership constraint. Sets without
/// one can be handed to solvers that lack regex support.
pub fn uses_regex(set: &mut FormulaSet) -> bool {
    synthesize(
        set,
        USES_REGEX,
        false,
        |node, below| below || node.kind() == Kind::RegexConstraint,
        |a, b| a || b,
    )
}
