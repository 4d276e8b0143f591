//! Sibling-tab router.
//!
//! Exactly one route exists per declared name, in declaration order, and
//! focus switches between them.  A visit `history` of route keys drives
//! `GO_BACK` according to the configured [`BackBehavior`].

use serde::{Deserialize, Serialize};

use super::base;
use super::Router;
use crate::domain::declaration::validate_route_names;
use crate::domain::error::NavigationError;
use crate::domain::keys::{route_key, SharedKeyGenerator};
use crate::domain::model::{merge_params, NavigationState, Params, Route, RouteConfig};
use crate::protocol::action::Action;

pub const TAB_ROUTER_TYPE: &str = "tab";

/// What `GO_BACK` returns to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BackBehavior {
    /// The previously focused tab, most recent first.
    #[default]
    History,
    /// The initial route, from any other tab.
    InitialRoute,
    /// The tab declared before the focused one.
    Order,
    /// Never handled.
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabRouterOptions {
    pub initial_route_name: Option<String>,
    pub back_behavior: BackBehavior,
}

#[derive(Debug, Clone)]
pub struct TabRouter {
    options: TabRouterOptions,
    keys: SharedKeyGenerator,
}

impl TabRouter {
    pub fn new(options: TabRouterOptions, keys: SharedKeyGenerator) -> Self {
        Self { options, keys }
    }

    pub fn back_behavior(&self) -> BackBehavior {
        self.options.back_behavior
    }

    fn initial_index(&self, route_names: &[String]) -> usize {
        self.options
            .initial_route_name
            .as_deref()
            .and_then(|name| route_names.iter().position(|n| n == name))
            .unwrap_or(0)
    }

    /// History for a state that has just been focused on `index` with no
    /// prior visits.
    fn seed_history(&self, routes: &[Route], route_names: &[String], index: usize) -> Vec<String> {
        let focused = routes[index].key.clone();
        match self.options.back_behavior {
            BackBehavior::Order => routes[..=index].iter().map(|r| r.key.clone()).collect(),
            BackBehavior::InitialRoute => {
                let initial = self.initial_index(route_names);
                if initial == index {
                    vec![focused]
                } else {
                    vec![routes[initial].key.clone(), focused]
                }
            }
            BackBehavior::History | BackBehavior::None => vec![focused],
        }
    }

    /// Moves focus to `index`, recording the visit.
    fn focus(&self, state: &NavigationState, index: usize) -> NavigationState {
        let mut next = state.clone();
        next.index = index;
        let key = next.routes[index].key.clone();
        match self.options.back_behavior {
            BackBehavior::History => {
                next.history.retain(|k| *k != key);
                next.history.push(key);
            }
            _ => next.history = self.seed_history(&next.routes, &next.route_names, index),
        }
        next
    }

    /// Rebuilds the route list over `config`, keeping routes by name.
    fn reconcile(&self, state: &NavigationState, config: &RouteConfig, merge: bool) -> Vec<Route> {
        config
            .route_names
            .iter()
            .map(|name| match state.routes.iter().find(|r| &r.name == name) {
                Some(existing) => {
                    let mut route = existing.clone();
                    if route.key.is_empty() {
                        route.key = route_key(&*self.keys, name);
                    }
                    if merge {
                        route.params = merge_params(config.params_for(name), existing.params.as_ref());
                    }
                    route
                }
                None => base::fresh_route(&*self.keys, name, config),
            })
            .collect()
    }

    /// Index of the previously focused route's name in `routes`, else the
    /// initial route.
    fn carried_index(&self, state: &NavigationState, routes: &[Route], route_names: &[String]) -> usize {
        state
            .focused_route()
            .and_then(|focused| routes.iter().position(|r| r.name == focused.name))
            .unwrap_or_else(|| self.initial_index(route_names))
    }

    fn carried_history(&self, state: &NavigationState, routes: &[Route], route_names: &[String], index: usize) -> Vec<String> {
        let history: Vec<String> = state
            .history
            .iter()
            .filter(|k| routes.iter().any(|r| &r.key == *k))
            .cloned()
            .collect();
        if history.is_empty() {
            self.seed_history(routes, route_names, index)
        } else {
            history
        }
    }

    fn jump(
        &self,
        state: &NavigationState,
        position: Option<usize>,
        params: Option<&Params>,
        merge: bool,
    ) -> Option<NavigationState> {
        let position = position?;
        let mut next = self.focus(state, position);
        if let Some(params) = params {
            let route = &mut next.routes[position];
            route.params = if merge {
                merge_params(route.params.as_ref(), Some(params))
            } else {
                Some(params.clone())
            };
        }
        Some(next)
    }

    fn go_back(&self, state: &NavigationState) -> Option<NavigationState> {
        if self.options.back_behavior == BackBehavior::None || state.history.len() <= 1 {
            return None;
        }
        let mut history = state.history.clone();
        history.pop();
        let previous = history.last()?;
        let index = state.position_of_key(previous)?;

        let mut next = state.clone();
        next.index = index;
        next.history = history;
        Some(next)
    }
}

impl Router for TabRouter {
    type State = NavigationState;

    fn router_type(&self) -> &'static str {
        TAB_ROUTER_TYPE
    }

    fn get_initial_state(&self, config: &RouteConfig) -> Result<NavigationState, NavigationError> {
        validate_route_names(&config.route_names)?;
        let routes: Vec<Route> = config
            .route_names
            .iter()
            .map(|name| base::fresh_route(&*self.keys, name, config))
            .collect();
        let index = self.initial_index(&config.route_names);
        let history = self.seed_history(&routes, &config.route_names, index);

        let mut state = base::fresh_state(&*self.keys, TAB_ROUTER_TYPE, config, routes, index);
        state.history = history;
        Ok(state)
    }

    fn get_rehydrated_state(
        &self,
        state: &NavigationState,
        config: &RouteConfig,
    ) -> Result<NavigationState, NavigationError> {
        if !state.stale {
            return Ok(state.clone());
        }
        validate_route_names(&config.route_names)?;

        let routes = self.reconcile(state, config, true);
        let index = self.carried_index(state, &routes, &config.route_names);
        let history = self.carried_history(state, &routes, &config.route_names, index);

        let mut next = base::fresh_state(&*self.keys, TAB_ROUTER_TYPE, config, routes, index);
        next.history = history;
        Ok(next)
    }

    fn get_state_for_route_names_change(
        &self,
        state: &NavigationState,
        config: &RouteConfig,
    ) -> Result<NavigationState, NavigationError> {
        validate_route_names(&config.route_names)?;

        let routes = self.reconcile(state, config, false);
        let index = self.carried_index(state, &routes, &config.route_names);
        let history = self.carried_history(state, &routes, &config.route_names, index);

        let mut next = state.clone();
        next.route_names = config.route_names.clone();
        next.routes = routes;
        next.index = index;
        next.history = history;
        Ok(next)
    }

    fn get_state_for_route_focus(&self, state: &NavigationState, key: &str) -> NavigationState {
        match state.position_of_key(key) {
            Some(position) if position != state.index => self.focus(state, position),
            _ => state.clone(),
        }
    }

    fn get_state_for_action(
        &self,
        state: &NavigationState,
        action: &Action,
    ) -> Result<Option<NavigationState>, NavigationError> {
        let next = match action {
            Action::JumpTo { name, params } => {
                self.jump(state, state.position_of_name(name), params.as_ref(), false)
            }
            Action::Navigate { name, key, params } => {
                let position = match key {
                    Some(key) => state.position_of_key(key),
                    None => state.position_of_name(name),
                };
                self.jump(state, position, params.as_ref(), true)
            }
            Action::GoBack => self.go_back(state),
            _ => base::get_state_for_action(state, action),
        };
        Ok(next)
    }

    fn should_action_change_focus(&self, action: &Action) -> bool {
        matches!(action, Action::Navigate { .. } | Action::JumpTo { .. })
    }
}
