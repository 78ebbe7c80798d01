// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics for scene containers.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Scene`](crate::scene::Scene) calls as it fans out lifecycle calls,
//! dispatches touches, and mutates its layer set. All method bodies default
//! to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] owns an optional boxed sink. When the `trace` feature is
//! **off**, every `Tracer` method compiles to nothing and no sink is stored.
//! When **on**, each method performs a single `Option` branch before
//! dispatching.
//!
//! Sinks never influence control flow: they receive copies of plain event
//! structs and return nothing.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use kurbo::Point;

use crate::lifecycle::{LifecycleState, Transition};
use crate::touch::{PointerId, TouchPhase};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after `setup` has been fanned out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SetupEvent {
    /// Number of layers that received `setup`.
    pub layer_count: u32,
    /// Lifecycle state after setup.
    pub state: LifecycleState,
}

/// Emitted for every `resize` request, accepted or not.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeEvent {
    /// Requested width in pixels.
    pub width: u32,
    /// Requested height in pixels.
    pub height: u32,
    /// The aspect ratio passed to layers, or `None` if the request was
    /// rejected.
    pub aspect: Option<f32>,
}

/// Emitted for every lifecycle notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionEvent {
    /// The requested transition.
    pub transition: Transition,
    /// State before the request.
    pub from: LifecycleState,
    /// State after the request, or `None` if it was rejected.
    pub to: Option<LifecycleState>,
}

/// What happened to the layer set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerChange {
    /// A layer was inserted under a free id.
    Added(i32),
    /// A layer replaced (and dropped) the previous occupant of an id.
    Replaced(i32),
    /// The layer under this id was dropped.
    Removed(i32),
    /// Every layer was dropped.
    Cleared {
        /// How many layers were dropped.
        dropped: u32,
    },
}

/// Emitted after the layer set changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerChangeEvent {
    /// The change.
    pub change: LayerChange,
    /// Layer count after the change.
    pub layer_count: u32,
}

/// Emitted after a touch has been dispatched through the layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchDispatchEvent {
    /// Contact the event belonged to.
    pub pointer: PointerId,
    /// Phase of the event.
    pub phase: TouchPhase,
    /// Event position.
    pub position: Point,
    /// How many layers were asked before the walk stopped.
    pub visited: u32,
    /// Id of the consuming layer, if any.
    pub handled_by: Option<i32>,
}

/// Emitted after a graphics-context change has been fanned out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContextChangedEvent {
    /// Number of layers notified.
    pub layer_count: u32,
}

/// Emitted after a back-key press was offered to the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackKeyEvent {
    /// Whether the scene consumed the key.
    pub handled: bool,
}

/// Emitted when queued structural changes were applied after a traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeferredEvent {
    /// Number of commands applied.
    pub applied: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from a scene.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after `setup` was fanned out.
    fn on_setup(&mut self, e: &SetupEvent) {
        _ = e;
    }

    /// Called for every resize request.
    fn on_resize(&mut self, e: &ResizeEvent) {
        _ = e;
    }

    /// Called for every lifecycle notification.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called after the layer set changed.
    fn on_layer_change(&mut self, e: &LayerChangeEvent) {
        _ = e;
    }

    /// Called after a touch was dispatched.
    fn on_touch(&mut self, e: &TouchDispatchEvent) {
        _ = e;
    }

    /// Called after a context change was fanned out.
    fn on_context_changed(&mut self, e: &ContextChangedEvent) {
        _ = e;
    }

    /// Called after a back-key press was offered.
    fn on_back_key(&mut self, e: &BackKeyEvent) {
        _ = e;
    }

    /// Called after deferred commands were applied.
    fn on_deferred(&mut self, e: &DeferredEvent) {
        _ = e;
    }
}

/// Lets a host keep a handle to a sink it has handed to a [`Tracer`].
impl<S: TraceSink + ?Sized> TraceSink for Rc<RefCell<S>> {
    fn on_setup(&mut self, e: &SetupEvent) {
        self.borrow_mut().on_setup(e);
    }

    fn on_resize(&mut self, e: &ResizeEvent) {
        self.borrow_mut().on_resize(e);
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.borrow_mut().on_transition(e);
    }

    fn on_layer_change(&mut self, e: &LayerChangeEvent) {
        self.borrow_mut().on_layer_change(e);
    }

    fn on_touch(&mut self, e: &TouchDispatchEvent) {
        self.borrow_mut().on_touch(e);
    }

    fn on_context_changed(&mut self, e: &ContextChangedEvent) {
        self.borrow_mut().on_context_changed(e);
    }

    fn on_back_key(&mut self, e: &BackKeyEvent) {
        self.borrow_mut().on_back_key(e);
    }

    fn on_deferred(&mut self, e: &DeferredEvent) {
        self.borrow_mut().on_deferred(e);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Owning wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, the sink passed to [`new`](Self::new)
/// is dropped immediately and every method compiles to nothing.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! dispatch {
    ($(#[$doc:meta] $name:ident => $method:ident($ty:ty);)*) => {
        $(
            #[$doc]
            #[inline]
            pub fn $name(&mut self, e: &$ty) {
                #[cfg(feature = "trace")]
                if let Some(s) = &mut self.sink {
                    s.$method(e);
                }
                #[cfg(not(feature = "trace"))]
                {
                    _ = e;
                }
            }
        )*
    };
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            drop(sink);
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns whether events reach a sink.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    dispatch! {
        /// Emits a [`SetupEvent`].
        setup => on_setup(SetupEvent);
        /// Emits a [`ResizeEvent`].
        resize => on_resize(ResizeEvent);
        /// Emits a [`TransitionEvent`].
        transition => on_transition(TransitionEvent);
        /// Emits a [`LayerChangeEvent`].
        layer_change => on_layer_change(LayerChangeEvent);
        /// Emits a [`TouchDispatchEvent`].
        touch => on_touch(TouchDispatchEvent);
        /// Emits a [`ContextChangedEvent`].
        context_changed => on_context_changed(ContextChangedEvent);
        /// Emits a [`BackKeyEvent`].
        back_key => on_back_key(BackKeyEvent);
        /// Emits a [`DeferredEvent`].
        deferred => on_deferred(DeferredEvent);
    }
}

/// Saturating `usize` → `u32` for event counters.
#[inline]
pub(crate) fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
