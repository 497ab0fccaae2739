// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Line-based writer for SMT-LIB scripts

use crate::data::node::ExprNode;
use itertools::Itertools;
use std::fmt::{self, Write};

enum Step<'a> {
    Node(&'a ExprNode),
    Text(&'static str),
}

/// Writes SMT-LIB text. Expressions are emitted from an explicit work stack,
/// so nesting depth is not limited by the call stack.
pub struct SmtWriter<W: Write> {
    out: W,
}

impl<W: Write> SmtWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write a complete line
    pub fn line(&mut self, s: &str) -> fmt::Result {
        self.out.write_str(s)?;
        self.out.write_char('\n')
    }

    /// `(declare-fun name () Sort)`
    pub fn declare_fun(&mut self, name: &str, sort: &str) -> fmt::Result {
        writeln!(self.out, "(declare-fun {} () {})", name, sort)
    }

    /// `(assert expr)`
    pub fn assert(&mut self, expr: &ExprNode) -> fmt::Result {
        self.out.write_str("(assert ")?;
        self.expr(expr)?;
        self.line(")")
    }

    /// Write one expression:
    /// - a constant as its literal text,
    /// - an indexed operator as `((_ op p...) args...)`,
    /// - an application as `(op args...)`,
    /// - anything else without arguments as its declaration name.
    pub fn expr(&mut self, root: &ExprNode) -> fmt::Result {
        let mut stack = vec![Step::Node(root)];
        while let Some(step) = stack.pop() {
            let node = match step {
                Step::Text(text) => {
                    self.out.write_str(text)?;
                    continue;
                }
                Step::Node(node) => node,
            };

            if node.is_constant() && !node.literal_params().is_empty() {
                self.out.write_str(&node.literal_params().concat())?;
                continue;
            }
            if node.children().is_empty() {
                self.out.write_str(node.operator())?;
                continue;
            }

            if node.literal_params().is_empty() {
                write!(self.out, "({}", node.operator())?;
            } else {
                write!(
                    self.out,
                    "((_ {} {})",
                    node.operator(),
                    node.literal_params().iter().join(" ")
                )?;
            }
            stack.push(Step::Text(")"));
            for child in node.children().iter().rev() {
                stack.push(Step::Node(child));
                stack.push(Step::Text(" "));
            }
        }
        Ok(())
    }
}
