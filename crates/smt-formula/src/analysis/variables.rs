// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Variable inventory: the unique variable names of each sort

use super::{evaluate_set, synthesize};
use crate::data::attribute::VariableMap;
use crate::data::formula_set::FormulaSet;
use crate::data::node::ExprNode;

pub const VARIABLES: &str = "variables";

/// Compute the inventory on every node and on the set
pub fn collect_variables(set: &mut FormulaSet) -> VariableMap {
    synthesize(set, VARIABLES, VariableMap::new(), gather_variable, merge_variables)
}

/// Inventory of `set` without touching any attribute map
pub fn variables_of(set: &FormulaSet) -> VariableMap {
    evaluate_set(set, VariableMap::new(), gather_variable, merge_variables)
}

/// Add the node itself if it is a variable. Variables whose sort could not
/// be resolved cannot be declared and are left out.
fn gather_variable(node: &ExprNode, mut vars: VariableMap) -> VariableMap {
    if let (true, Some(sort)) = (node.is_variable(), node.sort()) {
        vars.entry(sort).or_default().insert(node.operator().to_string());
    }
    vars
}

pub fn merge_variables(mut into: VariableMap, from: VariableMap) -> VariableMap {
    for (sort, names) in from {
        into.entry(sort).or_default().extend(names);
    }
    into
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::data::attribute::AttributeValue;
    use crate::data::sort::Sort;
    use crate::source::ArenaGraph;
    use std::collections::BTreeSet;

    fn names(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_inventory_per_sort() {
        let mut g = ArenaGraph::new();
        let x = g.variable("x", "String");
        let y = g.variable("y", "Int");
        let len = g.apply("str.len", "Int", [x]);
        let eq = g.apply("=", "Bool", [len, y]);
        let x_again = g.apply("str.++", "String", [x, x]);
        let eq2 = g.apply("=", "Bool", [x_again, x]);

        let mut set = build(&g, &[eq, eq2]).unwrap();
        let vars = collect_variables(&mut set);
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[&Sort::String], names(&["x"]));
        assert_eq!(vars[&Sort::Int], names(&["y"]));

        // per-node values only cover the node's own subtree
        let len_vars = set[0].children()[0].attribute(VARIABLES).and_then(AttributeValue::as_variables);
        assert_eq!(len_vars.map(|v| v.len()), Some(1));
    }

    #[test]
    fn test_unresolved_variables_are_skipped() {
        let mut g = ArenaGraph::new();
        let a = g.variable("a", "(Array Int Int)");
        let i = g.variable("i", "Int");
        let sel = g.apply("select", "Int", [a, i]);
        let eq = g.apply("=", "Bool", [sel, i]);

        let set = build(&g, &[eq]).unwrap();
        let vars = variables_of(&set);
        assert_eq!(vars.keys().copied().collect::<Vec<_>>(), vec![Sort::Int]);
    }

    #[test]
    fn test_merge_unions_names() {
        let mut a = VariableMap::new();
        a.insert(Sort::String, names(&["x", "y"]));
        let mut b = VariableMap::new();
        b.insert(Sort::String, names(&["y", "z"]));
        b.insert(Sort::Bool, names(&["p"]));
        let merged = merge_variables(a, b);
        assert_eq!(merged[&Sort::String], names(&["x", "y", "z"]));
        assert_eq!(merged[&Sort::Bool], names(&["p"]));
    }
}
