// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Synthesized attributes over formula sets
//!
//! Every derived fact is a bottom-up fold described by three things: a
//! neutral value, a local function `f(node, folded_children) -> value`, and a
//! merge `m(value, value) -> value` used left to right over siblings and over
//! the roots of a set. Each sibling fold starts from its own clone of the
//! neutral value.
//!
//! Folds run on an explicit stack. Values are computed first and only written
//! to the tree once the whole pass succeeded.

mod probe;
mod structure;
mod variables;

pub use probe::{probe, Instance, ProbeCounts, ProbeRecord};
pub use structure::{
    count_nodes, operator_histogram, tree_depth, uses_regex, DEPTH, NODE_COUNT, OPERATOR_HISTOGRAM,
    USES_REGEX,
};
pub use variables::{collect_variables, merge_variables, variables_of, VARIABLES};

use crate::data::attribute::AttributeValue;
use crate::data::formula_set::FormulaSet;
use crate::data::node::ExprNode;
use log::debug;
use std::convert::Infallible;

struct Frame<'a, V> {
    node: &'a ExprNode,
    next_child: usize,
    folded: Option<V>,
    slot: usize,
}

/// Fold one tree. When `record` is given, the value of every node is pushed
/// at its pre-order position.
fn fold_tree<V, E, F, M>(
    root: &ExprNode,
    neutral: &V,
    f: &mut F,
    m: &mut M,
    mut record: Option<&mut Vec<Option<V>>>,
) -> Result<V, E>
where
    V: Clone,
    F: FnMut(&ExprNode, V) -> Result<V, E>,
    M: FnMut(V, V) -> Result<V, E>,
{
    let mut next_slot = 0;
    let mut open_slot = |record: &mut Option<&mut Vec<Option<V>>>| {
        if let Some(values) = record.as_deref_mut() {
            values.push(None);
        }
        next_slot += 1;
        next_slot - 1
    };

    let mut stack = vec![Frame {
        node: root,
        next_child: 0,
        folded: Some(neutral.clone()),
        slot: open_slot(&mut record),
    }];

    while let Some(frame) = stack.last_mut() {
        if let Some(child) = frame.node.children.get(frame.next_child) {
            frame.next_child += 1;
            let slot = open_slot(&mut record);
            stack.push(Frame {
                node: child,
                next_child: 0,
                folded: Some(neutral.clone()),
                slot,
            });
            continue;
        }

        let Some(done) = stack.pop() else { break };
        let folded = match done.folded {
            Some(folded) => folded,
            None => neutral.clone(),
        };
        let value = f(done.node, folded)?;
        if let Some(values) = record.as_deref_mut() {
            values[done.slot] = Some(value.clone());
        }
        match stack.last_mut() {
            Some(parent) => {
                let acc = match parent.folded.take() {
                    Some(acc) => acc,
                    None => neutral.clone(),
                };
                parent.folded = Some(m(acc, value)?);
            }
            None => return Ok(value),
        }
    }

    // the root frame always returns from inside the loop
    f(root, neutral.clone())
}

/// Write recorded values back in pre-order
fn store_values<V: Into<AttributeValue>>(root: &mut ExprNode, key: &str, values: Vec<Option<V>>) {
    let mut values = values.into_iter();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let Some(Some(value)) = values.next() {
            node.attributes.insert(key.to_string(), value.into());
        }
        stack.extend(node.children.iter_mut().rev());
    }
}

fn never<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Value of the fold at `root` without storing anything
pub fn evaluate<V, F, M>(root: &ExprNode, neutral: V, mut f: F, mut m: M) -> V
where
    V: Clone,
    F: FnMut(&ExprNode, V) -> V,
    M: FnMut(V, V) -> V,
{
    never(fold_tree(
        root,
        &neutral,
        &mut |node: &ExprNode, v| Ok(f(node, v)),
        &mut |a, b| Ok(m(a, b)),
        None,
    ))
}

/// Aggregate of the fold over all roots of `set` without storing anything
pub fn evaluate_set<V, F, M>(set: &FormulaSet, neutral: V, mut f: F, mut m: M) -> V
where
    V: Clone,
    F: FnMut(&ExprNode, V) -> V,
    M: FnMut(V, V) -> V,
{
    let mut aggregate = neutral.clone();
    for root in set.iter() {
        let value = evaluate(root, neutral.clone(), &mut f, &mut m);
        aggregate = m(aggregate, value);
    }
    aggregate
}

/// Compute `key` on every node of one tree, returning the root's value
pub fn synthesize_tree<V, F, M>(root: &mut ExprNode, key: &str, neutral: V, mut f: F, mut m: M) -> V
where
    V: Clone + Into<AttributeValue>,
    F: FnMut(&ExprNode, V) -> V,
    M: FnMut(V, V) -> V,
{
    let mut values = Vec::new();
    let value = never(fold_tree(
        root,
        &neutral,
        &mut |node: &ExprNode, v| Ok(f(node, v)),
        &mut |a, b| Ok(m(a, b)),
        Some(&mut values),
    ));
    store_values(root, key, values);
    value
}

/// Compute `key` on every node of every root and store the merged aggregate
/// on the set. Returns the aggregate.
pub fn synthesize<V, F, M>(set: &mut FormulaSet, key: &str, neutral: V, mut f: F, mut m: M) -> V
where
    V: Clone + Into<AttributeValue>,
    F: FnMut(&ExprNode, V) -> V,
    M: FnMut(V, V) -> V,
{
    never(try_synthesize(
        set,
        key,
        neutral,
        |node: &ExprNode, v| Ok(f(node, v)),
        |a, b| Ok(m(a, b)),
    ))
}

/// Fallible form of [`synthesize`].
///
/// An error from `f` or `m` aborts the pass: no value computed by it is kept,
/// `key` is removed from every node and from the set, and the error is
/// returned as is.
pub fn try_synthesize<V, E, F, M>(
    set: &mut FormulaSet,
    key: &str,
    neutral: V,
    mut f: F,
    mut m: M,
) -> Result<V, E>
where
    V: Clone + Into<AttributeValue>,
    F: FnMut(&ExprNode, V) -> Result<V, E>,
    M: FnMut(V, V) -> Result<V, E>,
{
    debug!("computing attribute `{}` over {} assertion(s)", key, set.len());
    match fold_set(set, &neutral, &mut f, &mut m) {
        Ok((aggregate, per_root)) => {
            for (root, values) in set.roots.iter_mut().zip(per_root) {
                store_values(root, key, values);
            }
            set.attributes.insert(key.to_string(), aggregate.clone().into());
            Ok(aggregate)
        }
        Err(err) => {
            debug!("attribute `{}` aborted, discarding its values", key);
            for root in set.roots.iter_mut() {
                root.clear_attribute(key);
            }
            set.attributes.remove(key);
            Err(err)
        }
    }
}

type RecordedValues<V> = Vec<Vec<Option<V>>>;

fn fold_set<V, E, F, M>(
    set: &FormulaSet,
    neutral: &V,
    f: &mut F,
    m: &mut M,
) -> Result<(V, RecordedValues<V>), E>
where
    V: Clone,
    F: FnMut(&ExprNode, V) -> Result<V, E>,
    M: FnMut(V, V) -> Result<V, E>,
{
    let mut aggregate = neutral.clone();
    let mut per_root = Vec::with_capacity(set.len());
    for root in set.iter() {
        let mut values = Vec::new();
        let value = fold_tree(root, neutral, f, m, Some(&mut values))?;
        aggregate = m(aggregate, value)?;
        per_root.push(values);
    }
    Ok((aggregate, per_root))
}

/// Visit every node of every root in post-order, for effects only
pub fn for_each_post_order<F: FnMut(&ExprNode)>(set: &FormulaSet, mut f: F) {
    for root in set.iter() {
        root.for_each_post_order(&mut f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::source::ArenaGraph;

    fn sample() -> FormulaSet {
        // (= (str.++ x "a") y), (>= n 0)
        let mut g = ArenaGraph::new();
        let x = g.variable("x", "String");
        let a = g.constant("\"a\"", "String");
        let y = g.variable("y", "String");
        let cat = g.apply("str.++", "String", [x, a]);
        let eq = g.apply("=", "Bool", [cat, y]);
        let n = g.variable("n", "Int");
        let zero = g.constant("0", "Int");
        let ge = g.apply(">=", "Bool", [n, zero]);
        build(&g, &[eq, ge]).unwrap()
    }

    #[test]
    fn test_values_are_stored_per_node() {
        let mut set = sample();
        let total = synthesize(
            &mut set,
            "leaves",
            0u64,
            |node, folded| if node.children().is_empty() { folded + 1 } else { folded },
            |a, b| a + b,
        );
        assert_eq!(total, 5);
        assert_eq!(set.attribute("leaves"), Some(&AttributeValue::Count(5)));
        assert_eq!(set[0].attribute("leaves"), Some(&AttributeValue::Count(3)));
        assert_eq!(set[0].children()[0].attribute("leaves"), Some(&AttributeValue::Count(2)));
        assert_eq!(set[1].attribute("leaves"), Some(&AttributeValue::Count(2)));
        for node in set[0].iter() {
            assert!(node.attribute("leaves").is_some());
        }
    }

    #[test]
    fn test_children_are_merged_left_to_right() {
        let mut set = sample();
        let mut order = Vec::new();
        let mut local = |node: &ExprNode, folded: u64| {
            order.push(node.id());
            folded
        };
        evaluate(&set[0], 0u64, &mut local, |a, b| a + b);
        assert_eq!(order, vec![3, 4, 1, 2, 0]);

        let root = set.get_mut(0).unwrap();
        synthesize_tree(root, "ids", 0u64, |node, folded| folded * 10 + node.id() as u64, |a, b| a * 10 + b);
        // x=3, "a"=4 -> str.++ = (0*10+3)*10+4 = 34 -> 34*10+1 = 341
        assert_eq!(set[0].children()[0].attribute("ids"), Some(&AttributeValue::Count(341)));
    }

    #[test]
    fn test_failed_pass_leaves_no_values() {
        let mut set = sample();
        synthesize(&mut set, "size", 0u64, |_, folded| folded + 1, |a, b| a + b);

        let result: Result<u64, String> = try_synthesize(
            &mut set,
            "size",
            0u64,
            |node, folded| {
                if node.operator() == "n" {
                    Err(format!("cannot handle {}", node.operator()))
                } else {
                    Ok(folded + 1)
                }
            },
            |a, b| Ok(a + b),
        );
        assert_eq!(result.unwrap_err(), "cannot handle n");
        assert!(set.attribute("size").is_none());
        for root in set.iter() {
            assert!(root.iter().all(|node| node.attribute("size").is_none()));
        }
    }

    #[test]
    fn test_merge_error_aborts() {
        let mut set = sample();
        let result: Result<u64, &str> =
            try_synthesize(&mut set, "k", 0u64, |_, folded| Ok(folded + 1), |_, _| Err("merge"));
        assert_eq!(result, Err("merge"));
        assert!(set[0].attribute("k").is_none());
    }

    #[test]
    fn test_neutral_value_is_fresh_per_sibling() {
        let mut set = sample();
        // a neutral value mutated in place must not leak between siblings
        let lists = evaluate_set(
            &set,
            Vec::<usize>::new(),
            |node, mut folded| {
                folded.push(node.id());
                folded
            },
            |mut a, b| {
                a.extend(b);
                a
            },
        );
        assert_eq!(lists, vec![3, 4, 1, 2, 0, 6, 7, 5]);
        let count = synthesize(&mut set, "n", 0u64, |_, c| c + 1, |a, b| a + b);
        assert_eq!(count, 8);
    }

    #[test]
    fn test_post_order_effects() {
        let set = sample();
        let mut seen = Vec::new();
        for_each_post_order(&set, |node| seen.push(node.id()));
        assert_eq!(seen, vec![3, 4, 1, 2, 0, 6, 7, 5]);
    }
}
