// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for scene operations.

use core::fmt;

use crate::lifecycle::InvalidTransition;

/// Errors reported by [`Scene`](crate::scene::Scene) operations.
///
/// Lookups and removals never fail; they return `Option`/`bool`. Only
/// operations whose input can violate a caller contract return this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneError {
    /// `resize` was called with a zero height; no aspect ratio exists.
    ZeroHeight {
        /// The width that accompanied the zero height.
        width: u32,
    },
    /// A lifecycle notification arrived in a state that does not accept it.
    InvalidTransition(InvalidTransition),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroHeight { width } => {
                write!(f, "cannot resize to {width}x0: height must be non-zero")
            }
            Self::InvalidTransition(e) => write!(f, "invalid lifecycle transition: {e}"),
        }
    }
}

impl core::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::ZeroHeight { .. } => None,
            Self::InvalidTransition(e) => Some(e),
        }
    }
}

impl From<InvalidTransition> for SceneError {
    fn from(e: InvalidTransition) -> Self {
        Self::InvalidTransition(e)
    }
}
