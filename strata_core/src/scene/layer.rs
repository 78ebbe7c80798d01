// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The layer capability.

use alloc::boxed::Box;
use core::fmt;

use crate::touch::TouchEvent;

/// A top-level update/render unit owned by a [`Scene`](super::Scene).
///
/// Only [`render`](Self::render) is required; every other hook defaults to
/// doing nothing (or, for [`on_touch`](Self::on_touch), to declining the
/// event).
pub trait Layer {
    /// Builds resources. Called when the owning scene is set up.
    fn setup(&mut self) {}

    /// The drawable surface changed shape; `aspect` is width / height.
    fn resize(&mut self, aspect: f32) {
        _ = aspect;
    }

    /// Advances and renders one frame.
    ///
    /// `dt` is the elapsed time in seconds, or `0.0` while
    /// [`is_paused`](Self::is_paused) is true.
    fn render(&mut self, dt: f32);

    /// The graphics context was recreated; cached GPU resources are gone.
    fn on_context_changed(&mut self) {}

    /// Offers a touch event. Return `true` to consume it, which stops
    /// dispatch to the layers below.
    fn on_touch(&mut self, event: &TouchEvent) -> bool {
        _ = event;
        false
    }

    /// Whether time is frozen for this layer.
    fn is_paused(&self) -> bool {
        false
    }
}

/// A structural change to a scene, queued from inside a traversal.
///
/// See [`deferred`](crate::deferred).
pub enum LayerCommand {
    /// Insert (or replace) a layer under the id.
    Add(i32, Box<dyn Layer>),
    /// Drop the layer under the id, if any.
    Remove(i32),
    /// Drop every layer.
    Clear,
}

impl fmt::Debug for LayerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(id, _) => f.debug_tuple("Add").field(id).finish_non_exhaustive(),
            Self::Remove(id) => f.debug_tuple("Remove").field(id).finish(),
            Self::Clear => f.write_str("Clear"),
        }
    }
}
