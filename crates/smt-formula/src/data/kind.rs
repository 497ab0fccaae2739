// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Structural classification of expression nodes

use crate::data::sort::Sort;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Structural class of a node, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Kind {
    Variable,
    Constant,
    WordEquation,
    LengthConstraint,
    RegexConstraint,
    HigherOrderFunction,
    Other,
}

/// Operators treated as opaque functional terms.
///
/// The set is closed: the probe record carries one column per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HigherOrderOp {
    #[serde(rename = "str.at")]
    At,
    #[serde(rename = "str.substr")]
    Substr,
    #[serde(rename = "str.prefixof")]
    PrefixOf,
    #[serde(rename = "str.suffixof")]
    SuffixOf,
    #[serde(rename = "str.contains")]
    Contains,
    #[serde(rename = "str.indexof")]
    IndexOf,
    #[serde(rename = "str.replace")]
    Replace,
    #[serde(rename = "str.from_int")]
    IntToStr,
    #[serde(rename = "str.to_int")]
    StrToInt,
}

/// Registry of higher-order operator spellings, SMT-LIB 2.6 first, then the
/// 2.5 aliases still emitted by older benchmarks.
const HIGHER_ORDER_OPERATORS: &[(&str, HigherOrderOp)] = &[
    ("str.at", HigherOrderOp::At),
    ("str.substr", HigherOrderOp::Substr),
    ("str.prefixof", HigherOrderOp::PrefixOf),
    ("str.suffixof", HigherOrderOp::SuffixOf),
    ("str.contains", HigherOrderOp::Contains),
    ("str.indexof", HigherOrderOp::IndexOf),
    ("str.replace", HigherOrderOp::Replace),
    ("str.from_int", HigherOrderOp::IntToStr),
    ("str.to_int", HigherOrderOp::StrToInt),
    ("int.to.str", HigherOrderOp::IntToStr),
    ("str.from-int", HigherOrderOp::IntToStr),
    ("str.to.int", HigherOrderOp::StrToInt),
    ("str.to-int", HigherOrderOp::StrToInt),
];

/// String-in-regular-language membership predicate
const REGEX_MEMBERSHIP_OPERATORS: &[&str] = &["str.in_re", "str.in.re"];

impl HigherOrderOp {
    pub const ALL: [HigherOrderOp; 9] = [
        HigherOrderOp::At,
        HigherOrderOp::Substr,
        HigherOrderOp::PrefixOf,
        HigherOrderOp::SuffixOf,
        HigherOrderOp::Contains,
        HigherOrderOp::IndexOf,
        HigherOrderOp::Replace,
        HigherOrderOp::IntToStr,
        HigherOrderOp::StrToInt,
    ];

    /// Look up an operator name in the registry
    pub fn from_operator(operator: &str) -> Option<HigherOrderOp> {
        HIGHER_ORDER_OPERATORS
            .iter()
            .find(|(name, _)| *name == operator)
            .map(|(_, op)| *op)
    }

    /// Canonical SMT-LIB 2.6 name
    pub fn smtlib_name(&self) -> &'static str {
        match self {
            HigherOrderOp::At => "str.at",
            HigherOrderOp::Substr => "str.substr",
            HigherOrderOp::PrefixOf => "str.prefixof",
            HigherOrderOp::SuffixOf => "str.suffixof",
            HigherOrderOp::Contains => "str.contains",
            HigherOrderOp::IndexOf => "str.indexof",
            HigherOrderOp::Replace => "str.replace",
            HigherOrderOp::IntToStr => "str.from_int",
            HigherOrderOp::StrToInt => "str.to_int",
        }
    }
}

impl Display for HigherOrderOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.smtlib_name())
    }
}

pub fn is_regex_membership(operator: &str) -> bool {
    REGEX_MEMBERSHIP_OPERATORS.contains(&operator)
}

/// Facts about one node occurrence that classification may look at
#[derive(Debug, Clone, Copy)]
pub struct ClassifyInput<'a> {
    pub operator: &'a str,
    pub is_nullary_uninterpreted: bool,
    pub sort: Option<Sort>,
    pub child_sorts: &'a [Option<Sort>],
}

impl Kind {
    /// Classify a node. First matching rule wins.
    pub fn classify(input: ClassifyInput<'_>) -> Kind {
        let arity = input.child_sorts.len();
        if arity == 0 && input.is_nullary_uninterpreted {
            return Kind::Variable;
        }
        if arity == 0 {
            return Kind::Constant;
        }
        if HigherOrderOp::from_operator(input.operator).is_some() {
            return Kind::HigherOrderFunction;
        }
        if is_regex_membership(input.operator) {
            return Kind::RegexConstraint;
        }
        Kind::binary_predicate(input.sort, input.child_sorts).unwrap_or(Kind::Other)
    }

    /// Word equation or length constraint by shape alone: a Bool-sorted node
    /// with two String or two Int operands. The operator is not consulted.
    pub fn binary_predicate(sort: Option<Sort>, child_sorts: &[Option<Sort>]) -> Option<Kind> {
        if sort != Some(Sort::Bool) {
            return None;
        }
        match child_sorts {
            [Some(Sort::String), Some(Sort::String)] => Some(Kind::WordEquation),
            [Some(Sort::Int), Some(Sort::Int)] => Some(Kind::LengthConstraint),
            _ => None,
        }
    }
}
