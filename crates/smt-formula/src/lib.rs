// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! SMT formula trees
//!
//! This crate turns expression graphs produced by an SMT-LIB parsing engine
//! into owned, language-neutral trees, classifies every node for the string
//! constraint analyses, and computes derived facts with one generic bottom-up
//! fold. It does NOT parse SMT-LIB or decide satisfiability.

mod data;
pub mod analysis;
pub mod builder;
mod error;
mod options;
pub mod render;
pub mod source;

// Node model (from data/node.rs)
pub use data::node::{ExprNode, NodeId, Preorder};

// Classification (from data/kind.rs)
pub use data::kind::{ClassifyInput, HigherOrderOp, Kind};

// Sorts (from data/sort.rs)
pub use data::sort::Sort;

// Attribute values (from data/attribute.rs)
pub use data::attribute::{AttributeMap, AttributeValue, OperatorHistogram, VariableMap};

// Formula sets (from data/formula_set.rs)
pub use data::formula_set::FormulaSet;

// Construction
pub use builder::{build, TreeBuilder};
pub use error::{BuildError, SortDiagnostic, SortError};
pub use options::BuildOptions;
pub use source::{ArenaGraph, GraphNodeId, SourceGraph};

// Rendering
pub use render::{render_expr, render_script};
