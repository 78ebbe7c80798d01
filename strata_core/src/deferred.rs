// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred structural changes.
//!
//! A child cannot reach its parent container while the parent is walking its
//! children; the parent holds the only `&mut` to it. Children that need to
//! add or remove siblings (e.g. a layer that dismisses itself on touch)
//! instead push a command into a [`DeferredQueue`] handed to them by the
//! host. The container drains the queue once the current fan-out has
//! returned, so a traversal never observes a change in its own child list.
//!
//! Applying a command can drop a child, and a child's `Drop` may queue more
//! commands. Draining therefore repeats until the queue is empty, but stops
//! after [`MAX_DRAIN_PASSES`] passes; anything still pending waits for the
//! next drain. A child whose `Drop` queues a replacement of itself every time
//! would otherwise keep the container busy forever.
//!
//! Dropping a container discards whatever is still queued, so a pending
//! child holding a handle to the queue does not keep it alive.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

/// Upper bound on the number of batches a single drain applies.
pub const MAX_DRAIN_PASSES: usize = 64;

/// A shared, single-threaded command buffer.
///
/// Cloning produces another handle to the same buffer.
pub struct DeferredQueue<C> {
    inner: Rc<RefCell<Vec<C>>>,
}

impl<C> DeferredQueue<C> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Appends a command to be applied after the current traversal.
    pub fn push(&self, command: C) {
        self.inner.borrow_mut().push(command);
    }

    /// Returns the number of pending commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns whether no commands are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// Removes and returns all pending commands in push order.
    pub(crate) fn take(&self) -> Vec<C> {
        core::mem::take(&mut *self.inner.borrow_mut())
    }

    /// Drops pending commands without applying them.
    ///
    /// Commands queued while dropping are discarded too, up to
    /// [`MAX_DRAIN_PASSES`] batches.
    pub(crate) fn discard(&self) {
        for _ in 0..MAX_DRAIN_PASSES {
            let batch = self.take();
            if batch.is_empty() {
                return;
            }
            drop(batch);
        }
    }
}

impl<C> Clone for DeferredQueue<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C> Default for DeferredQueue<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for DeferredQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("pending", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn clones_share_the_buffer() {
        let queue = DeferredQueue::new();
        let handle = queue.clone();
        handle.push(1);
        handle.push(2);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.take(), vec![1, 2]);
        assert!(handle.is_empty());
    }

    struct Requeue {
        queue: DeferredQueue<Requeue>,
        drops: Rc<core::cell::Cell<usize>>,
    }

    impl Drop for Requeue {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
            self.queue.push(Requeue {
                queue: self.queue.clone(),
                drops: self.drops.clone(),
            });
        }
    }

    #[test]
    fn discard_is_bounded_when_drops_requeue() {
        let queue = DeferredQueue::new();
        let drops = Rc::new(core::cell::Cell::new(0));
        queue.push(Requeue {
            queue: queue.clone(),
            drops: drops.clone(),
        });

        queue.discard();
        assert_eq!(drops.get(), MAX_DRAIN_PASSES);
        assert_eq!(queue.len(), 1, "the last replacement stays queued");
    }
}
