//! Navigator: the host dispatcher for one router.
//!
//! A [`Navigator`] owns a router, the route declaration it was configured
//! with, the current state value and a FIFO queue of pending actions.  It is
//! the only place that replaces the state, so actions for one navigator are
//! always applied one at a time, in the order they were dispatched.
//!
//! # Action lifecycle (for beginners)
//!
//! ```text
//! dispatch(action) ──► pending queue ──► router.get_state_for_action(state, action)
//!                                              │
//!                          Some(next) ◄────────┴────────► None
//!                          state = next                   state unchanged, warn!
//! ```
//!
//! "Not handled" is normal: hiding an overlay that does not exist, going
//! back from the root of a stack.  Only configuration mistakes (a missing
//! `main` route) surface as errors.

use std::collections::VecDeque;

use surf_core::{Action, NavigationError, RouteConfig, Router};
use tracing::{debug, warn};

/// Holds the current state of one router and applies actions to it.
#[derive(Debug)]
pub struct Navigator<R: Router> {
    router: R,
    config: RouteConfig,
    state: R::State,
    pending: VecDeque<Action>,
}

impl<R: Router> Navigator<R> {
    /// Creates a navigator positioned on the router's initial state.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors from
    /// [`Router::get_initial_state`].
    pub fn new(router: R, config: RouteConfig) -> Result<Self, NavigationError> {
        let state = router.get_initial_state(&config)?;
        Ok(Self {
            router,
            config,
            state,
            pending: VecDeque::new(),
        })
    }

    /// Creates a navigator from a previously stored state, reconciling it
    /// against `config` first.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors from
    /// [`Router::get_rehydrated_state`].
    pub fn restore(router: R, config: RouteConfig, stored: &R::State) -> Result<Self, NavigationError> {
        let state = router.get_rehydrated_state(stored, &config)?;
        debug!(router = router.router_type(), "navigator restored from stored state");
        Ok(Self {
            router,
            config,
            state,
            pending: VecDeque::new(),
        })
    }

    pub fn state(&self) -> &R::State {
        &self.state
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    /// Number of actions waiting to be applied.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Queues `action` without applying it.
    pub fn enqueue(&mut self, action: Action) {
        self.pending.push_back(action);
    }

    /// Applies every queued action in FIFO order.
    ///
    /// Returns how many of them were handled.  On error the failing action
    /// is dropped and the rest stay queued.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error raised by the router.
    pub fn process_pending(&mut self) -> Result<usize, NavigationError> {
        let mut handled = 0;
        while let Some(action) = self.pending.pop_front() {
            if self.apply(&action)? {
                handled += 1;
            }
        }
        Ok(handled)
    }

    /// Queues `action` and drains the queue.
    ///
    /// Returns whether `action` itself was handled.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error raised while draining.
    pub fn dispatch(&mut self, action: Action) -> Result<bool, NavigationError> {
        self.enqueue(action);
        let mut last = false;
        while let Some(action) = self.pending.pop_front() {
            last = self.apply(&action)?;
        }
        Ok(last)
    }

    /// Moves focus to the route with `key`.  Unknown keys are ignored.
    pub fn focus(&mut self, key: &str) {
        self.state = self.router.get_state_for_route_focus(&self.state, key);
    }

    /// Replaces the route declaration and adapts the current state to it.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors from
    /// [`Router::get_state_for_route_names_change`].
    pub fn set_route_config(&mut self, config: RouteConfig) -> Result<(), NavigationError> {
        self.state = self
            .router
            .get_state_for_route_names_change(&self.state, &config)?;
        self.config = config;
        Ok(())
    }

    /// Whether the host should move focus into this navigator after `action`.
    pub fn should_action_change_focus(&self, action: &Action) -> bool {
        self.router.should_action_change_focus(action)
    }

    fn apply(&mut self, action: &Action) -> Result<bool, NavigationError> {
        debug!(router = self.router.router_type(), action = action.kind(), "dispatching action");
        match self.router.get_state_for_action(&self.state, action)? {
            Some(next) => {
                self.state = next;
                Ok(true)
            }
            None => {
                warn!(
                    router = self.router.router_type(),
                    action = action.kind(),
                    "action was not handled by any route"
                );
                Ok(false)
            }
        }
    }
}
