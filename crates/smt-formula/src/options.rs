// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Tree builder options

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options controlling tree construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildOptions {
    /// Upper bound on the number of owned nodes one formula set may expand
    /// into. Sharing in the source graph can make the owned tree
    /// exponentially larger than the graph; `None` means unbounded.
    pub max_occurrences: Option<usize>,
    /// Keep a record of nodes whose sort could not be mapped
    pub record_sort_diagnostics: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_occurrences: None,
            record_sort_diagnostics: true,
        }
    }
}

impl BuildOptions {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("invalid build options")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read build options from {}", path.display()))?;
        Self::from_toml_str(&content)
    }
}
