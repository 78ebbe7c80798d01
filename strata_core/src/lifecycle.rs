// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene lifecycle state machine.
//!
//! ```text
//!   Created ──setup──► Inactive ◄──suspend── Active ◄──end── Started
//!                          │                  ▲  │             ▲
//!                          └─────activate─────┘  └────start────┘
//! ```
//!
//! `suspend` is also accepted from `Started` so a host can background the
//! app while a scene is the foreground transition target. `setup` may be
//! repeated after the first call (e.g. to rebuild resources); it then leaves
//! the state unchanged.
//!
//! The state belongs to the scene as a whole. Containers do not fan these
//! transitions out to their children.

use core::fmt;

/// Where a scene is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Constructed, not yet set up.
    #[default]
    Created,
    /// Set up, not receiving frames.
    Inactive,
    /// Receiving frames, not the foreground transition target.
    Active,
    /// Active and fully transitioned in.
    Started,
}

/// A request to move between [`LifecycleState`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Initial (or repeated) setup.
    Setup,
    /// Become active.
    Activate,
    /// Stop receiving frames.
    Suspend,
    /// Scene switch into this scene finished.
    Start,
    /// Scene switch away from this scene began.
    End,
}

impl Transition {
    /// Returns the state reached by applying `self` in `from`, or `None` if
    /// the transition is not allowed there.
    #[must_use]
    pub const fn target(self, from: LifecycleState) -> Option<LifecycleState> {
        use LifecycleState::{Active, Created, Inactive, Started};
        match (self, from) {
            (Self::Setup, Created) => Some(Inactive),
            (Self::Setup, other) => Some(other),
            (Self::Activate, Inactive) => Some(Active),
            (Self::Suspend, Active | Started) => Some(Inactive),
            (Self::Start, Active) => Some(Started),
            (Self::End, Started) => Some(Active),
            _ => None,
        }
    }
}

/// A transition was requested in a state that does not allow it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InvalidTransition {
    /// State at the time of the request (unchanged).
    pub from: LifecycleState,
    /// The rejected transition.
    pub transition: Transition,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot apply {:?} in state {:?}", self.transition, self.from)
    }
}

impl core::error::Error for InvalidTransition {}

/// Tracks the current [`LifecycleState`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    /// Creates a state machine in [`LifecycleState::Created`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: LifecycleState::Created,
        }
    }

    /// Returns the current state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// Applies `transition`, returning the new state.
    ///
    /// On error the state is left untouched.
    pub fn apply(&mut self, transition: Transition) -> Result<LifecycleState, InvalidTransition> {
        match transition.target(self.state) {
            Some(next) => {
                self.state = next;
                Ok(next)
            }
            None => Err(InvalidTransition {
                from: self.state,
                transition,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle() {
        let mut lc = Lifecycle::new();
        assert_eq!(lc.apply(Transition::Setup), Ok(LifecycleState::Inactive));
        assert_eq!(lc.apply(Transition::Activate), Ok(LifecycleState::Active));
        assert_eq!(lc.apply(Transition::Start), Ok(LifecycleState::Started));
        assert_eq!(lc.apply(Transition::End), Ok(LifecycleState::Active));
        assert_eq!(lc.apply(Transition::Suspend), Ok(LifecycleState::Inactive));
    }

    #[test]
    fn activate_before_setup_is_rejected() {
        let mut lc = Lifecycle::new();
        let err = lc.apply(Transition::Activate).unwrap_err();
        assert_eq!(err.from, LifecycleState::Created);
        assert_eq!(err.transition, Transition::Activate);
        assert_eq!(lc.state(), LifecycleState::Created);
    }

    #[test]
    fn suspend_from_started_goes_inactive() {
        let mut lc = Lifecycle::new();
        lc.apply(Transition::Setup).unwrap();
        lc.apply(Transition::Activate).unwrap();
        lc.apply(Transition::Start).unwrap();
        assert_eq!(lc.apply(Transition::Suspend), Ok(LifecycleState::Inactive));
    }

    #[test]
    fn repeated_setup_keeps_state() {
        let mut lc = Lifecycle::new();
        lc.apply(Transition::Setup).unwrap();
        lc.apply(Transition::Activate).unwrap();
        assert_eq!(lc.apply(Transition::Setup), Ok(LifecycleState::Active));
    }

    #[test]
    fn start_requires_active() {
        let mut lc = Lifecycle::new();
        lc.apply(Transition::Setup).unwrap();
        assert!(lc.apply(Transition::Start).is_err());
        assert!(lc.apply(Transition::End).is_err());
        assert_eq!(lc.state(), LifecycleState::Inactive);
    }
}
