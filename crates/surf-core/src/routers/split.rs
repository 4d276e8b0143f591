//! Split router: one navigation state, two representations.
//!
//! # How the conversion works (for beginners)
//!
//! On a wide viewport the application shows two panes: `main` on the left is
//! always visible and the right pane shows whichever route has focus.  That
//! is naturally a *tab* state: one route per declared name, focus moves
//! between siblings, and focus must never rest on `main` (it is already on
//! screen).
//!
//! On a narrow viewport only one screen fits, so the same routes become a
//! *stack*: `main` at the root and at most one secondary screen on top.
//!
//! ```text
//!   split (tab)                          stacked
//!   routes: [main, first, second]  <-->  routes: [main, second]
//!   index:   2 (second)                  index:   1
//! ```
//!
//! Route keys survive both directions, so per-screen state attached to a key
//! (scroll positions, drafts) is not lost when the window is resized.  Any
//! push history deeper than one frame is dropped on the way to split mode.
//!
//! The current mode is stored in [`SplitState`] rather than in the router, so
//! the reducer stays a pure function of `(state, action)`.

use std::sync::Arc;

use tracing::{debug, info};

use super::stack::{StackRouter, StackRouterOptions};
use super::tab::{BackBehavior, TabRouter, TabRouterOptions};
use super::Router;
use crate::domain::error::NavigationError;
use crate::domain::keys::{route_key, KeyGenerator, SharedKeyGenerator};
use crate::domain::model::{
    NavigationState, Route, RouteConfig, SplitMode, SplitState, MAIN_ROUTE_NAME,
};
use crate::protocol::action::Action;

/// Type tag of every state this router emits.  It never changes with the
/// mode so hosts do not rebuild the state on a layout flip.
pub const SPLIT_ROUTER_TYPE: &str = "surf";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitRouterOptions {
    /// Route focused when split mode would otherwise focus `main`.
    pub initial_route_name: Option<String>,
    /// Representation used for initial and rehydrated states.
    pub is_split: bool,
    pub back_behavior: BackBehavior,
}

#[derive(Debug, Clone)]
pub struct SplitRouter {
    options: SplitRouterOptions,
    tab: TabRouter,
    stack: StackRouter,
    keys: SharedKeyGenerator,
}

impl SplitRouter {
    pub fn new(options: SplitRouterOptions, keys: SharedKeyGenerator) -> Self {
        let tab = TabRouter::new(
            TabRouterOptions {
                initial_route_name: options.initial_route_name.clone(),
                back_behavior: options.back_behavior,
            },
            Arc::clone(&keys),
        );
        let stack = StackRouter::new(
            StackRouterOptions {
                initial_route_name: Some(MAIN_ROUTE_NAME.to_string()),
            },
            Arc::clone(&keys),
        );
        Self {
            options,
            tab,
            stack,
            keys,
        }
    }

    pub fn options(&self) -> &SplitRouterOptions {
        &self.options
    }

    fn wrap(
        &self,
        mut navigation: NavigationState,
        mode: SplitMode,
        mode_announced: bool,
        initial_route_name: Option<String>,
    ) -> SplitState {
        navigation.router_type = SPLIT_ROUTER_TYPE.to_string();
        SplitState {
            navigation,
            mode,
            mode_announced,
            initial_route_name,
        }
    }

    /// Re-wraps a delegated result, keeping the mode bookkeeping of `state`.
    fn carry(&self, state: &SplitState, navigation: NavigationState) -> SplitState {
        self.wrap(
            navigation,
            state.mode,
            state.mode_announced,
            state.initial_route_name.clone(),
        )
    }

    fn active(&self, mode: SplitMode) -> &dyn Router<State = NavigationState> {
        if mode.is_split() {
            &self.tab
        } else {
            &self.stack
        }
    }

    fn convert(
        &self,
        state: &SplitState,
        is_split: bool,
        initial_route_name: Option<String>,
    ) -> Result<SplitState, NavigationError> {
        let navigation = if is_split {
            require_main(&state.navigation.route_names)?;
            let mut tab = stack_state_to_tab(
                &state.navigation,
                initial_route_name.as_deref(),
                &*self.keys,
            );
            ensure_tab_focus(&mut tab, initial_route_name.as_deref());
            tab
        } else {
            collapse_to_stack(&state.navigation, &*self.keys)
        };

        let mode = SplitMode::from_flag(is_split);
        info!(
            from = ?state.mode,
            to = ?mode,
            routes = navigation.routes.len(),
            focused = navigation.focused_route().map(|r| r.name.as_str()).unwrap_or(""),
            "converted navigation layout"
        );
        Ok(self.wrap(navigation, mode, true, initial_route_name))
    }

    fn set_split(
        &self,
        state: &SplitState,
        is_split: bool,
        initial_route_name: Option<&String>,
    ) -> Result<SplitState, NavigationError> {
        if !state.mode_announced {
            debug!(is_split, "layout mode announced");
            let mut next = state.clone();
            next.mode = SplitMode::from_flag(is_split);
            next.mode_announced = true;
            return Ok(next);
        }

        let initial_route_name = initial_route_name
            .cloned()
            .or_else(|| state.initial_route_name.clone());

        if state.is_split() == is_split {
            let mut next = state.clone();
            next.initial_route_name = initial_route_name;
            return Ok(next);
        }

        self.convert(state, is_split, initial_route_name)
    }
}

impl Router for SplitRouter {
    type State = SplitState;

    fn router_type(&self) -> &'static str {
        SPLIT_ROUTER_TYPE
    }

    fn get_initial_state(&self, config: &RouteConfig) -> Result<SplitState, NavigationError> {
        require_main(&config.route_names)?;
        let mode = SplitMode::from_flag(self.options.is_split);
        let navigation = if mode.is_split() {
            let mut state = self.tab.get_initial_state(config)?;
            ensure_tab_focus(&mut state, self.options.initial_route_name.as_deref());
            state
        } else {
            let state = self.stack.get_initial_state(config)?;
            collapse_to_stack(&state, &*self.keys)
        };
        Ok(self.wrap(
            navigation,
            mode,
            false,
            self.options.initial_route_name.clone(),
        ))
    }

    fn get_rehydrated_state(
        &self,
        state: &SplitState,
        config: &RouteConfig,
    ) -> Result<SplitState, NavigationError> {
        if !state.navigation.stale {
            return Ok(state.clone());
        }
        require_main(&config.route_names)?;

        let mode = SplitMode::from_flag(self.options.is_split);
        let initial_route_name = state
            .initial_route_name
            .clone()
            .or_else(|| self.options.initial_route_name.clone());
        let navigation = if mode.is_split() {
            let mut next = self.tab.get_rehydrated_state(&state.navigation, config)?;
            ensure_tab_focus(&mut next, initial_route_name.as_deref());
            next
        } else {
            let next = self.stack.get_rehydrated_state(&state.navigation, config)?;
            collapse_to_stack(&next, &*self.keys)
        };
        debug!(?mode, "split state rehydrated");
        Ok(self.wrap(navigation, mode, false, initial_route_name))
    }

    fn get_state_for_route_names_change(
        &self,
        state: &SplitState,
        config: &RouteConfig,
    ) -> Result<SplitState, NavigationError> {
        require_main(&config.route_names)?;
        let mut navigation = self
            .active(state.mode)
            .get_state_for_route_names_change(&state.navigation, config)?;
        if state.is_split() {
            ensure_tab_focus(&mut navigation, state.initial_route_name.as_deref());
        }
        Ok(self.carry(state, navigation))
    }

    fn get_state_for_route_focus(&self, state: &SplitState, key: &str) -> SplitState {
        let mut navigation = self
            .active(state.mode)
            .get_state_for_route_focus(&state.navigation, key);
        if state.is_split() {
            ensure_tab_focus(&mut navigation, state.initial_route_name.as_deref());
        }
        self.carry(state, navigation)
    }

    fn get_state_for_action(
        &self,
        state: &SplitState,
        action: &Action,
    ) -> Result<Option<SplitState>, NavigationError> {
        if let Action::SetSplit {
            is_split,
            initial_route_name,
        } = action
        {
            return self
                .set_split(state, *is_split, initial_route_name.as_ref())
                .map(Some);
        }

        if !state.is_split() {
            let next = self.stack.get_state_for_action(&state.navigation, action)?;
            return Ok(next.map(|navigation| self.carry(state, navigation)));
        }

        let mut current = state.navigation.clone();
        drop_main_from_history(&mut current);
        match self.tab.get_state_for_action(&current, action)? {
            Some(navigation) if navigation.focused_route().is_some_and(Route::is_main) => {
                debug!(action = action.kind(), "split mode never focuses main");
                Ok(None)
            }
            Some(mut navigation) => {
                drop_main_from_history(&mut navigation);
                Ok(Some(self.carry(state, navigation)))
            }
            None => Ok(None),
        }
    }

    fn should_action_change_focus(&self, action: &Action) -> bool {
        self.tab.should_action_change_focus(action)
    }
}

fn require_main(route_names: &[String]) -> Result<(), NavigationError> {
    if route_names.iter().any(|n| n == MAIN_ROUTE_NAME) {
        Ok(())
    } else {
        Err(NavigationError::MissingMainRoute)
    }
}

/// Moves split-mode focus off `main`: to `initial_route_name` when declared,
/// else the next route, else the first route that is not `main`.  `main`'s
/// key is also dropped from the visit history so `GO_BACK` cannot return to
/// it.
pub(crate) fn ensure_tab_focus(state: &mut NavigationState, initial_route_name: Option<&str>) {
    if state.focused_route().is_some_and(Route::is_main) {
        let preferred = initial_route_name
            .filter(|name| *name != MAIN_ROUTE_NAME)
            .and_then(|name| state.position_of_name(name));
        let next = state.index + 1;
        let target = preferred
            .or_else(|| (next < state.routes.len()).then_some(next))
            .or_else(|| state.routes.iter().position(|r| !r.is_main()));

        if let Some(index) = target {
            state.index = index;
            if !state.history.is_empty() {
                state.history = vec![state.routes[index].key.clone()];
            }
        }
    }
    drop_main_from_history(state);
}

fn drop_main_from_history(state: &mut NavigationState) {
    if let Some(main_key) = state.route_named(MAIN_ROUTE_NAME).map(|r| r.key.clone()) {
        state.history.retain(|key| *key != main_key);
    }
}

/// Converts a tab-shaped (or any) state to the stacked shape:
/// `[main]` when `main` is focused, otherwise `[main, focused]`.
pub(crate) fn collapse_to_stack(state: &NavigationState, keys: &dyn KeyGenerator) -> NavigationState {
    let main = state
        .route_named(MAIN_ROUTE_NAME)
        .cloned()
        .unwrap_or_else(|| Route::new(route_key(keys, MAIN_ROUTE_NAME), MAIN_ROUTE_NAME, None));

    let mut next = state.clone();
    next.history.clear();
    match state.focused_route() {
        Some(current) if !current.is_main() => {
            next.routes = vec![main, current.clone()];
            next.index = 1;
        }
        _ => {
            next.routes = vec![main];
            next.index = 0;
        }
    }
    next
}

/// Converts a stacked state to the tab shape: one route per declared name,
/// existing routes kept by name, focus carried over by name.
pub(crate) fn stack_state_to_tab(
    state: &NavigationState,
    initial_route_name: Option<&str>,
    keys: &dyn KeyGenerator,
) -> NavigationState {
    let routes: Vec<Route> = state
        .route_names
        .iter()
        .map(|name| {
            state
                .route_named(name)
                .cloned()
                .unwrap_or_else(|| Route::new(route_key(keys, name), name.clone(), None))
        })
        .collect();

    let position_of = |name: &str| state.route_names.iter().position(|n| n == name);
    let index = match state.focused_route() {
        Some(current) if !current.is_main() => position_of(current.name.as_str()),
        _ => initial_route_name.and_then(position_of),
    }
    .unwrap_or(0);

    let mut next = state.clone();
    next.routes = routes;
    next.index = index;
    next.history.clear();
    next
}
