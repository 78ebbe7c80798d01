// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View identity types.

use alloc::rc::Rc;
use core::any::Any;
use core::fmt;

/// Identifies one insertion into a [`ViewGroup`](super::ViewGroup).
///
/// Handles are issued by [`add_view`](super::ViewGroup::add_view) and are
/// unique within the issuing group; a handle is never reused, so a handle to
/// a removed view simply no longer matches anything.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewHandle(pub(crate) u64);

impl ViewHandle {
    /// Returns the raw serial (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn serial(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ViewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewHandle({})", self.0)
    }
}

/// Opaque user payload attached to a view for lookup.
///
/// Without a comparator, two payloads are equal only if they are the same
/// allocation.
pub type UserObj = Rc<dyn Any>;

/// Custom payload equality: `compare(wanted, candidate)`.
pub type CompareFn = dyn Fn(&UserObj, &UserObj) -> bool;

/// Returns whether `candidate` matches `wanted` under `compare`, falling
/// back to identity when no comparator is given.
#[must_use]
pub fn user_obj_matches(
    wanted: &UserObj,
    candidate: Option<&UserObj>,
    compare: Option<&CompareFn>,
) -> bool {
    let Some(candidate) = candidate else {
        return false;
    };
    match compare {
        Some(compare) => compare(wanted, candidate),
        None => Rc::ptr_eq(wanted, candidate),
    }
}
