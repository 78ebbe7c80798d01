// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained-mode scene containers for interactive rendering.
//!
//! `strata_core` provides the two composition primitives a game- or
//! app-style frame loop is built from: a keyed [`Scene`](scene::Scene) of
//! full-surface layers, and an ordered [`ViewGroup`](view::ViewGroup) of
//! views that nests into trees. It is `no_std` compatible (with `alloc`) and
//! single-threaded: containers own their children outright and drop them
//! synchronously.
//!
//! # Architecture
//!
//! A host drives one scene with platform callbacks; the scene fans each call
//! out to its layers, and a layer may in turn own a view tree:
//!
//! ```text
//!   Host (platform callbacks)
//!       │  setup / resize / step / touch / back key / lifecycle
//!       ▼
//!   Scene ──► Layer (id 0) ──► ViewGroup ──► View, ViewGroup ──► ...
//!         ──► Layer (id 1)
//!         ──► Layer (id 2)
//!
//!   fan-out:  bottom ──► top      touch:  top ──► bottom, first consumer wins
//! ```
//!
//! **[`scene`]** — [`Scene`](scene::Scene) and the [`Layer`](scene::Layer)
//! trait. Layers are keyed by `i32`; adding under an occupied id replaces
//! (and drops) the previous layer.
//!
//! **[`view`]** — [`ViewGroup`](view::ViewGroup) and the
//! [`View`](view::View) trait. Views are drawn in insertion order and found
//! by user id or user object.
//!
//! **[`lifecycle`]** — the activation state machine a scene tracks for
//! itself.
//!
//! **[`touch`]** — the [`TouchEvent`](touch::TouchEvent) both containers
//! dispatch.
//!
//! **[`deferred`]** — queues for structural changes requested from inside a
//! traversal.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types,
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! **[`error`]** — [`SceneError`](error::SceneError).
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod deferred;
pub mod error;
pub mod lifecycle;
pub mod scene;
pub mod touch;
pub mod trace;
pub mod view;
