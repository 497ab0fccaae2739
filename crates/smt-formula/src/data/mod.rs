// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

pub mod attribute;
pub mod formula_set;
pub mod kind;
pub mod node;
pub mod sort;
