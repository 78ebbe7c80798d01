// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch input events.
//!
//! A [`TouchEvent`] is produced by the host from raw platform input and passed
//! by reference down the container hierarchy. Containers never interpret it;
//! they only decide *who* sees it and stop at the first consumer.

use core::fmt;

use kurbo::Point;

/// Identifies one contact (finger, pen, mouse button) across its phases.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PointerId(pub u32);

impl fmt::Debug for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PointerId({})", self.0)
    }
}

/// Which stage of a contact this event reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// Contact started.
    Down,
    /// Contact moved while held.
    Move,
    /// Contact released.
    Up,
    /// The platform aborted the contact (e.g. a system gesture took over).
    Cancel,
}

/// A single touch sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    /// Which contact this sample belongs to.
    pub pointer: PointerId,
    /// Stage of the contact.
    pub phase: TouchPhase,
    /// Position in host surface coordinates.
    pub position: Point,
}

impl TouchEvent {
    /// Creates an event for the primary pointer.
    #[must_use]
    pub const fn new(phase: TouchPhase, position: Point) -> Self {
        Self {
            pointer: PointerId(0),
            phase,
            position,
        }
    }

    /// Returns a copy of this event attributed to `pointer`.
    #[must_use]
    pub const fn with_pointer(mut self, pointer: PointerId) -> Self {
        self.pointer = pointer;
        self
    }
}
