// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`ViewGroup`] container.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use super::id::{CompareFn, UserObj, ViewHandle, user_obj_matches};
use super::{Animation, View};
use crate::deferred::{DeferredQueue, MAX_DRAIN_PASSES};
use crate::touch::TouchEvent;

/// A structural change to a view group, queued from inside a traversal.
///
/// See [`deferred`](crate::deferred).
pub enum ViewCommand {
    /// Append a view.
    Add(Box<dyn View>),
    /// Drop the view with this handle, if still present.
    Remove(ViewHandle),
    /// Drop the first view with this user id, if any.
    RemoveById(i32),
    /// Drop every view.
    Clear,
}

impl fmt::Debug for ViewCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add(view) => f.debug_tuple("Add").field(&view.user_id()).finish(),
            Self::Remove(handle) => f.debug_tuple("Remove").field(handle).finish(),
            Self::RemoveById(id) => f.debug_tuple("RemoveById").field(id).finish(),
            Self::Clear => f.write_str("Clear"),
        }
    }
}

struct ViewSlot {
    handle: ViewHandle,
    view: Box<dyn View>,
}

/// An owning, ordered container of [`View`]s that is itself a view.
pub struct ViewGroup {
    user_id: i32,
    user_obj: Option<UserObj>,
    views: Vec<ViewSlot>,
    next_handle: u64,
    deferred: DeferredQueue<ViewCommand>,
}

impl Default for ViewGroup {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Drop for ViewGroup {
    fn drop(&mut self) {
        self.views.clear();
        self.deferred.discard();
    }
}

impl fmt::Debug for ViewGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewGroup")
            .field("user_id", &self.user_id)
            .field("has_user_obj", &self.user_obj.is_some())
            .field("count", &self.views.len())
            .field("next_handle", &self.next_handle)
            .field("deferred", &self.deferred)
            .finish()
    }
}

impl ViewGroup {
    /// Creates an empty group with the given user id.
    #[must_use]
    pub fn new(user_id: i32) -> Self {
        Self {
            user_id,
            user_obj: None,
            views: Vec::new(),
            next_handle: 0,
            deferred: DeferredQueue::new(),
        }
    }

    /// Attaches a user object to this group.
    #[must_use]
    pub fn with_user_obj(mut self, user_obj: UserObj) -> Self {
        self.user_obj = Some(user_obj);
        self
    }

    /// Replaces this group's user id.
    pub fn set_user_id(&mut self, user_id: i32) {
        self.user_id = user_id;
    }

    /// Returns a handle through which children can request structural
    /// changes while the group is traversing them.
    #[must_use]
    pub fn deferred(&self) -> DeferredQueue<ViewCommand> {
        self.deferred.clone()
    }

    // -- Ownership API --

    /// Appends `view`, making it the frontmost child.
    pub fn add_view(&mut self, view: Box<dyn View>) -> ViewHandle {
        let handle = ViewHandle(self.next_handle);
        self.next_handle += 1;
        self.views.push(ViewSlot { handle, view });
        handle
    }

    /// Drops the view added under `handle`.
    ///
    /// Returns `false` if it is no longer present.
    pub fn remove_view(&mut self, handle: ViewHandle) -> bool {
        self.remove_first(|s| s.handle == handle)
    }

    /// Drops the first view whose user id is `id`.
    ///
    /// Returns `false` if there is none.
    pub fn remove_view_by_id(&mut self, id: i32) -> bool {
        self.remove_first(|s| s.view.user_id() == id)
    }

    /// Drops every view, back to front.
    pub fn remove_all_views(&mut self) {
        self.views.clear();
    }

    /// Returns the view at `index` in draw order.
    #[must_use]
    pub fn view(&self, index: usize) -> Option<&dyn View> {
        let slot = self.views.get(index)?;
        Some(slot.view.as_ref())
    }

    /// Returns the view at `index` mutably.
    pub fn view_mut(&mut self, index: usize) -> Option<&mut dyn View> {
        let slot = self.views.get_mut(index)?;
        Some(slot.view.as_mut())
    }

    /// Returns the handle of the view at `index`.
    #[must_use]
    pub fn handle_at(&self, index: usize) -> Option<ViewHandle> {
        self.views.get(index).map(|s| s.handle)
    }

    /// Returns the first direct child carrying exactly this user object
    /// (same allocation).
    #[must_use]
    pub fn view_by_user_obj(&self, user_obj: &UserObj) -> Option<&dyn View> {
        let slot = self
            .views
            .iter()
            .find(|s| s.view.user_obj().is_some_and(|o| Rc::ptr_eq(o, user_obj)))?;
        Some(slot.view.as_ref())
    }

    /// Returns the number of direct children.
    #[must_use]
    pub fn count(&self) -> usize {
        self.views.len()
    }

    /// Iterates direct children in draw order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &dyn View> + '_ {
        self.views.iter().map(|s| s.view.as_ref())
    }

    // -- Deferred mutation --

    /// Applies structural changes queued through [`deferred`](Self::deferred).
    ///
    /// [`draw`](View::draw) and [`on_touch`](View::on_touch) call this once
    /// they have finished walking the children. Commands queued while
    /// applying are applied too, for at most [`MAX_DRAIN_PASSES`] batches;
    /// the rest stay queued. Returns the number of commands applied.
    pub fn apply_deferred(&mut self) -> usize {
        let mut applied = 0;
        for _ in 0..MAX_DRAIN_PASSES {
            let batch = self.deferred.take();
            if batch.is_empty() {
                break;
            }
            for command in batch {
                match command {
                    ViewCommand::Add(view) => {
                        self.add_view(view);
                    }
                    ViewCommand::Remove(handle) => {
                        self.remove_view(handle);
                    }
                    ViewCommand::RemoveById(id) => {
                        self.remove_view_by_id(id);
                    }
                    ViewCommand::Clear => self.remove_all_views(),
                }
                applied += 1;
            }
        }
        applied
    }

    fn remove_first(&mut self, pred: impl Fn(&ViewSlot) -> bool) -> bool {
        match self.views.iter().position(pred) {
            Some(pos) => {
                drop(self.views.remove(pos));
                true
            }
            None => false,
        }
    }
}

impl View for ViewGroup {
    fn user_id(&self) -> i32 {
        self.user_id
    }

    fn user_obj(&self) -> Option<&UserObj> {
        self.user_obj.as_ref()
    }

    fn draw(&mut self, dt: f64, animation: Option<&dyn Animation>) {
        for slot in &mut self.views {
            slot.view.draw(dt, animation);
        }
        self.apply_deferred();
    }

    fn on_touch(&mut self, event: &TouchEvent) -> bool {
        let handled = self
            .views
            .iter_mut()
            .rev()
            .any(|s| s.view.on_touch(event));
        self.apply_deferred();
        handled
    }

    fn find_view_by_id(&self, id: i32) -> Option<&dyn View> {
        if let Some(slot) = self.views.iter().find(|s| s.view.user_id() == id) {
            return Some(slot.view.as_ref());
        }
        self.views.iter().find_map(|s| s.view.find_view_by_id(id))
    }

    fn find_view_by_id_mut(&mut self, id: i32) -> Option<&mut dyn View> {
        if let Some(pos) = self.views.iter().position(|s| s.view.user_id() == id) {
            return Some(self.views[pos].view.as_mut());
        }
        self.views
            .iter_mut()
            .find_map(|s| s.view.find_view_by_id_mut(id))
    }

    fn find_view_by_user_obj(
        &self,
        wanted: &UserObj,
        compare: Option<&CompareFn>,
    ) -> Option<&dyn View> {
        if let Some(slot) = self
            .views
            .iter()
            .find(|s| user_obj_matches(wanted, s.view.user_obj(), compare))
        {
            return Some(slot.view.as_ref());
        }
        self.views
            .iter()
            .find_map(|s| s.view.find_view_by_user_obj(wanted, compare))
    }
}
