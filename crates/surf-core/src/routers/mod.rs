//! Routers: pure reducers over navigation state.
//!
//! # What is a router? (for beginners)
//!
//! A router owns no state.  It is a bundle of functions that take the
//! *current* state value plus some input (a route-name declaration, a route
//! key, or an [`Action`]) and return the *next* state value.  The caller (a
//! navigator) stores whatever comes back and feeds it into the next call.
//!
//! Keeping routers stateless makes every transition reproducible: the same
//! `(state, action)` pair always produces the same result, which is what lets
//! the tests below replay whole scenarios step by step.  The two exceptions
//! are fresh route keys (from the injected [`KeyGenerator`]) and the modal
//! router's [`OrderCounter`], both owned by the router instance.
//!
//! # Sub-modules
//!
//! - **`base`**  – `SET_PARAMS` handling shared by every router.
//! - **`stack`** – single-focus push/pop history.
//! - **`tab`**   – one route per name, focus switches between siblings.
//! - **`split`** – flips between the tab and stack shapes as the layout
//!   changes, without losing the focused route's identity.
//! - **`modal`** – overlays ordered by recency of being shown.
//!
//! [`KeyGenerator`]: crate::domain::keys::KeyGenerator
//! [`OrderCounter`]: crate::protocol::order::OrderCounter

pub mod base;
pub mod modal;
pub mod split;
pub mod stack;
pub mod tab;

use crate::domain::error::NavigationError;
use crate::domain::model::RouteConfig;
use crate::protocol::action::Action;

/// The contract every router fulfils.
///
/// `get_state_for_action` returns `Ok(None)` when the action does not apply
/// (unknown route name or key, nothing to go back to, an action type this
/// router ignores).  The caller must then keep its current state.  `Err` is
/// reserved for configuration mistakes such as a missing `main` route.
pub trait Router {
    type State: Clone + std::fmt::Debug;

    /// Constant tag written into every state this router produces.
    fn router_type(&self) -> &'static str;

    /// Builds a fresh state for `config`.
    fn get_initial_state(&self, config: &RouteConfig) -> Result<Self::State, NavigationError>;

    /// Reconciles a (possibly stale) stored state against `config`.
    ///
    /// A state that is not stale is returned as-is.
    fn get_rehydrated_state(
        &self,
        state: &Self::State,
        config: &RouteConfig,
    ) -> Result<Self::State, NavigationError>;

    /// Adapts `state` after the declared route names changed.
    fn get_state_for_route_names_change(
        &self,
        state: &Self::State,
        config: &RouteConfig,
    ) -> Result<Self::State, NavigationError>;

    /// Moves focus to the route with `key`.  Unknown keys leave the state as-is.
    fn get_state_for_route_focus(&self, state: &Self::State, key: &str) -> Self::State;

    /// Applies `action`.
    fn get_state_for_action(
        &self,
        state: &Self::State,
        action: &Action,
    ) -> Result<Option<Self::State>, NavigationError>;

    /// Whether the host should move focus into this navigator after `action`.
    fn should_action_change_focus(&self, action: &Action) -> bool;
}
