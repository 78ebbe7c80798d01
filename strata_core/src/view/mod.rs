// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered view container.
//!
//! A *view* is a drawable, touchable unit with a user id and an optional
//! opaque user object used for lookup. A [`ViewGroup`] owns an ordered list
//! of views and is itself a [`View`], so groups nest.
//!
//! - **Draw order** — insertion order, back-to-front: later views paint over
//!   earlier ones.
//! - **Touch order** — the reverse: the frontmost view is asked first and
//!   the first consumer ends dispatch.
//! - **Lookup** — [`find_view_by_id`](View::find_view_by_id) and
//!   [`find_view_by_user_obj`](View::find_view_by_user_obj) check a group's
//!   direct children before descending into nested groups.

mod group;
mod id;

use kurbo::Affine;

pub use group::{ViewCommand, ViewGroup};
pub use id::{CompareFn, UserObj, ViewHandle, user_obj_matches};

use crate::touch::TouchEvent;

/// Per-frame animation state applied while drawing.
///
/// The owner advances the animation; views only read it. A group forwards
/// the animation it is drawn with to each child, so a group-level animation
/// moves or fades the whole subtree.
pub trait Animation {
    /// Transform to apply on top of the view's own placement.
    fn transform(&self) -> Affine {
        Affine::IDENTITY
    }

    /// Opacity multiplier in `0.0..=1.0`.
    fn opacity(&self) -> f32 {
        1.0
    }
}

/// Upcasts a concrete view to `dyn View`.
///
/// Implemented for every sized [`View`]; it exists so default methods on
/// `View` can return `self` as a trait object.
pub trait AsView {
    /// Returns `self` as a view trait object.
    fn as_view(&self) -> &dyn View;

    /// Returns `self` as a mutable view trait object.
    fn as_view_mut(&mut self) -> &mut dyn View;
}

impl<T: View> AsView for T {
    fn as_view(&self) -> &dyn View {
        self
    }

    fn as_view_mut(&mut self) -> &mut dyn View {
        self
    }
}

/// A drawable, touchable unit owned by a [`ViewGroup`].
pub trait View: AsView {
    /// The user-assigned id used by [`find_view_by_id`](Self::find_view_by_id).
    fn user_id(&self) -> i32;

    /// The user object used by [`find_view_by_user_obj`](Self::find_view_by_user_obj).
    fn user_obj(&self) -> Option<&UserObj> {
        None
    }

    /// Draws one frame. `dt` is the time since the previous draw in seconds.
    fn draw(&mut self, dt: f64, animation: Option<&dyn Animation>);

    /// Offers a touch event. Return `true` to consume it.
    fn on_touch(&mut self, event: &TouchEvent) -> bool {
        _ = event;
        false
    }

    /// Finds the view with user id `id` in this subtree.
    ///
    /// A leaf matches only itself.
    fn find_view_by_id(&self, id: i32) -> Option<&dyn View> {
        (self.user_id() == id).then(|| self.as_view())
    }

    /// Mutable counterpart of [`find_view_by_id`](Self::find_view_by_id).
    fn find_view_by_id_mut(&mut self, id: i32) -> Option<&mut dyn View> {
        if self.user_id() == id {
            Some(self.as_view_mut())
        } else {
            None
        }
    }

    /// Finds the view whose user object matches `wanted` in this subtree.
    ///
    /// With `compare` set, a candidate matches when
    /// `compare(wanted, candidate)` is true; otherwise it must be the same
    /// allocation.
    fn find_view_by_user_obj(
        &self,
        wanted: &UserObj,
        compare: Option<&CompareFn>,
    ) -> Option<&dyn View> {
        user_obj_matches(wanted, self.user_obj(), compare).then(|| self.as_view())
    }
}
