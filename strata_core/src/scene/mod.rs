// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyed layer container.
//!
//! A [`Scene`] exclusively owns a set of [`Layer`]s, each stored under an
//! integer id. The scene:
//!
//! - **Owns** — adding under an occupied id drops the previous layer before
//!   storing the new one; removing or clearing drops synchronously.
//! - **Fans out** — `setup`, `resize`, `step`, and `on_context_changed` reach
//!   every layer bottom-to-top in the configured [`StackingOrder`].
//! - **Dispatches touches** — top-to-bottom; the first layer that consumes
//!   the event ends the walk.
//! - **Tracks its lifecycle** — activation state belongs to the scene as a
//!   whole and is not forwarded to layers (see [`lifecycle`](crate::lifecycle)).

mod config;
mod container;
mod layer;

pub use config::{SceneConfig, StackingOrder};
pub use container::Scene;
pub use layer::{Layer, LayerCommand};
