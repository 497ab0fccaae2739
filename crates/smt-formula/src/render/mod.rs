// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! SMT-LIB output for formula sets
//!
//! A script has a fixed shape: the logic header, one declaration per
//! variable grouped by sort with names in lexicographic order, one assertion
//! per root, and the solve request.

mod writer;

pub use writer::SmtWriter;

use crate::analysis::variables_of;
use crate::data::formula_set::FormulaSet;
use crate::data::node::ExprNode;
use std::fmt::{self, Display, Formatter, Write};

pub const SCRIPT_HEADER: &str = "(set-logic QF_SLIA)";
pub const SCRIPT_FOOTER: &str = "(check-sat)";

/// Write the full script for `set`.
///
/// Declarations come from a fresh variable inventory, so roots replaced or
/// inserted since the last attribute pass are declared too.
pub fn write_script<W: Write>(set: &FormulaSet, out: W) -> fmt::Result {
    emit_script(&mut SmtWriter::new(out), set)
}

pub fn render_script(set: &FormulaSet) -> String {
    let mut writer = SmtWriter::new(String::new());
    emit_script(&mut writer, set).expect("writing to a String is infallible");
    writer.into_inner()
}

fn emit_script<W: Write>(writer: &mut SmtWriter<W>, set: &FormulaSet) -> fmt::Result {
    writer.line(SCRIPT_HEADER)?;
    for (sort, names) in variables_of(set) {
        for name in names {
            writer.declare_fun(&name, sort.smtlib_name())?;
        }
    }
    for root in set.iter() {
        writer.assert(root)?;
    }
    writer.line(SCRIPT_FOOTER)
}

pub fn render_expr(node: &ExprNode) -> String {
    let mut writer = SmtWriter::new(String::new());
    writer.expr(node).expect("writing to a String is infallible");
    writer.into_inner()
}

impl Display for ExprNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        SmtWriter::new(f).expr(self)
    }
}

impl Display for FormulaSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_script(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::source::ArenaGraph;

    #[test]
    fn test_expression_forms() {
        // (str.in_re x ((_ re.loop 1 3) (str.to_re "ab")))
        let mut g = ArenaGraph::new();
        let x = g.variable("x", "String");
        let ab = g.constant("\"ab\"", "String");
        let to_re = g.apply("str.to_re", "RegLan", [ab]);
        let looped = g.apply_indexed("re.loop", ["1", "3"], "RegLan", [to_re]);
        let member = g.apply("str.in_re", "Bool", [x, looped]);

        let set = build(&g, &[member]).unwrap();
        assert_eq!(
            render_expr(&set[0]),
            "(str.in_re x ((_ re.loop 1 3) (str.to_re \"ab\")))"
        );
    }

    #[test]
    fn test_declarations_grouped_and_sorted() {
        let mut g = ArenaGraph::new();
        let b = g.variable("b", "String");
        let a = g.variable("a", "String");
        let n = g.variable("n", "Int");
        let p = g.variable("p", "Bool");
        let eq = g.apply("=", "Bool", [b, a]);
        let len = g.apply("str.len", "Int", [a]);
        let le = g.apply("<=", "Bool", [len, n]);
        let and = g.apply("and", "Bool", [p, eq, le]);

        let set = build(&g, &[and]).unwrap();
        let script = render_script(&set);
        let lines: Vec<&str> = script.lines().collect();
        assert_eq!(
            lines,
            vec![
                "(set-logic QF_SLIA)",
                "(declare-fun a () String)",
                "(declare-fun b () String)",
                "(declare-fun p () Bool)",
                "(declare-fun n () Int)",
                "(assert (and p (= b a) (<= (str.len a) n)))",
                "(check-sat)",
            ]
        );
        assert_eq!(set.to_string(), script);
        assert_eq!(set[0].to_string(), render_expr(&set[0]));
    }

    #[test]
    fn test_empty_set() {
        assert_eq!(
            render_script(&FormulaSet::new()),
            "(set-logic QF_SLIA)\n(check-sat)\n"
        );
    }
}
