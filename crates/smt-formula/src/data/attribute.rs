// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Stored form of synthesized attributes

use crate::data::sort::Sort;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Unique variable names per sort
pub type VariableMap = BTreeMap<Sort, BTreeSet<String>>;

/// Occurrences per operator name
pub type OperatorHistogram = BTreeMap<String, u64>;

/// Attribute key -> value
pub type AttributeMap = BTreeMap<String, AttributeValue>;

/// Value of an attribute as stored on a node or a formula set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    Count(u64),
    Flag(bool),
    Variables(VariableMap),
    Histogram(OperatorHistogram),
}

impl AttributeValue {
    pub fn as_count(&self) -> Option<u64> {
        match self {
            AttributeValue::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            AttributeValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_variables(&self) -> Option<&VariableMap> {
        match self {
            AttributeValue::Variables(vars) => Some(vars),
            _ => None,
        }
    }

    pub fn as_histogram(&self) -> Option<&OperatorHistogram> {
        match self {
            AttributeValue::Histogram(hist) => Some(hist),
            _ => None,
        }
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        AttributeValue::Count(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Flag(value)
    }
}

impl From<VariableMap> for AttributeValue {
    fn from(value: VariableMap) -> Self {
        AttributeValue::Variables(value)
    }
}

impl From<OperatorHistogram> for AttributeValue {
    fn from(value: OperatorHistogram) -> Self {
        AttributeValue::Histogram(value)
    }
}
