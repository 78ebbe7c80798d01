// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene configuration.

/// How a scene stacks its layers.
///
/// The stacking order is the z-order: lifecycle fan-out and rendering visit
/// layers bottom-to-top, touch dispatch visits them top-to-bottom.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StackingOrder {
    /// Ascending id; the highest id is on top. Replacing a layer keeps its
    /// place in the stack.
    #[default]
    ById,
    /// Insertion order; the most recently added layer is on top. Replacing
    /// a layer moves the replacement to the top.
    ByInsertion,
}

/// Configuration for a [`Scene`](super::Scene).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneConfig {
    /// Stacking policy for layers.
    pub stacking: StackingOrder,
}

impl SceneConfig {
    /// Layers stack by ascending id.
    #[must_use]
    pub const fn by_id() -> Self {
        Self {
            stacking: StackingOrder::ById,
        }
    }

    /// Layers stack in the order they were added.
    #[must_use]
    pub const fn by_insertion() -> Self {
        Self {
            stacking: StackingOrder::ByInsertion,
        }
    }
}
