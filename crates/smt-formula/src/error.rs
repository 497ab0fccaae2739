// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Errors raised while turning an engine graph into owned trees

use crate::data::node::NodeId;

/// Fatal errors while building or editing a formula set. A failed build
/// returns no set; a failed edit leaves the set unchanged.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The external graph contains a node reachable from itself
    #[error("malformed expression graph: cycle through `{node}`")]
    MalformedGraph { node: String },

    /// Expanding shared sub-expressions would produce more nodes than allowed
    #[error("expanding shared sub-expressions exceeds the limit of {limit} nodes")]
    OccurrenceLimitExceeded { limit: usize },

    /// A tree added to a formula set reuses an id already present in it
    #[error("node id {id} is already used in this formula set")]
    DuplicateNodeId { id: NodeId },
}

/// Recoverable sort errors. The node keeps an unresolved sort.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    #[error("unsupported sort `{sort_name}`")]
    UnsupportedSortKind { sort_name: String },
}

/// A sort error recorded during construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDiagnostic {
    pub node: NodeId,
    pub error: SortError,
}
