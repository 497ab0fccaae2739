// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Sorts understood by the expression tree

use crate::error::SortError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Sort of an expression node.
///
/// The derived ordering is the order in which declarations are grouped when
/// a formula set is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sort {
    String,
    Bool,
    Int,
    Regex,
}

impl Sort {
    pub const ALL: [Sort; 4] = [Sort::String, Sort::Bool, Sort::Int, Sort::Regex];

    /// Map a sort name reported by the parsing engine.
    ///
    /// Accepts the SMT-LIB names as well as the spellings used by engines that
    /// print the regular-expression sort as an applied sort.
    pub fn from_engine_name(name: &str) -> Result<Sort, SortError> {
        match name.trim() {
            "String" => Ok(Sort::String),
            "Bool" => Ok(Sort::Bool),
            "Int" => Ok(Sort::Int),
            "RegLan" | "ReSort(String)" | "(RegEx String)" | "RegEx" => Ok(Sort::Regex),
            other => Err(SortError::UnsupportedSortKind {
                sort_name: other.to_string(),
            }),
        }
    }

    /// Sort name as written in an SMT-LIB declaration
    pub fn smtlib_name(&self) -> &'static str {
        match self {
            Sort::String => "String",
            Sort::Bool => "Bool",
            Sort::Int => "Int",
            Sort::Regex => "RegLan",
        }
    }
}

impl Display for Sort {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.smtlib_name())
    }
}
