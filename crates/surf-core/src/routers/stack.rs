//! Single-focus stack router.
//!
//! Routes form a history: the last route is the visible one and `index`
//! always equals `routes.len() - 1`.  The same name may appear more than once
//! (pushing a second instance of a screen).

use tracing::debug;

use super::base;
use super::Router;
use crate::domain::declaration::validate_route_names;
use crate::domain::error::NavigationError;
use crate::domain::keys::{route_key, SharedKeyGenerator};
use crate::domain::model::{merge_params, NavigationState, Params, Route, RouteConfig};
use crate::protocol::action::Action;

pub const STACK_ROUTER_TYPE: &str = "stack";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackRouterOptions {
    /// Root route.  Falls back to the first declared name when absent or
    /// not declared.
    pub initial_route_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StackRouter {
    options: StackRouterOptions,
    keys: SharedKeyGenerator,
}

impl StackRouter {
    pub fn new(options: StackRouterOptions, keys: SharedKeyGenerator) -> Self {
        Self { options, keys }
    }

    fn initial_route_name<'a>(&'a self, config: &'a RouteConfig) -> &'a str {
        match self.options.initial_route_name.as_deref() {
            Some(name) if config.contains(name) => name,
            _ => config.route_names[0].as_str(),
        }
    }

    fn initial_route(&self, config: &RouteConfig) -> Route {
        base::fresh_route(&*self.keys, self.initial_route_name(config), config)
    }

    fn push(&self, state: &NavigationState, route: Route) -> NavigationState {
        let mut next = state.clone();
        next.routes.push(route);
        next.index = next.routes.len() - 1;
        next
    }

    /// Drops the routes above `position`, focusing it.
    fn pop_to(&self, state: &NavigationState, position: usize) -> NavigationState {
        let mut next = state.clone();
        next.routes.truncate(position + 1);
        next.index = position;
        next
    }

    fn navigate(
        &self,
        state: &NavigationState,
        name: &str,
        key: Option<&str>,
        params: Option<&Params>,
    ) -> Option<NavigationState> {
        if !state.route_names.iter().any(|n| n == name) {
            return None;
        }

        let existing = match key {
            Some(key) => state.position_of_key(key),
            None => state.routes.iter().rposition(|r| r.name == name),
        };

        match existing {
            Some(position) => {
                let mut next = self.pop_to(state, position);
                if params.is_some() {
                    let route = &mut next.routes[position];
                    route.params = merge_params(route.params.as_ref(), params);
                }
                Some(next)
            }
            None => {
                let key = key
                    .map(str::to_string)
                    .unwrap_or_else(|| route_key(&*self.keys, name));
                Some(self.push(state, Route::new(key, name, params.cloned())))
            }
        }
    }
}

impl Router for StackRouter {
    type State = NavigationState;

    fn router_type(&self) -> &'static str {
        STACK_ROUTER_TYPE
    }

    fn get_initial_state(&self, config: &RouteConfig) -> Result<NavigationState, NavigationError> {
        validate_route_names(&config.route_names)?;
        let routes = vec![self.initial_route(config)];
        Ok(base::fresh_state(&*self.keys, STACK_ROUTER_TYPE, config, routes, 0))
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

        let mut routes: Vec<Route> = state
            .routes
            .iter()
            .filter(|r| config.contains(&r.name))
            .map(|r| {
                let key = if r.key.is_empty() {
                    route_key(&*self.keys, &r.name)
                } else {
                    r.key.clone()
                };
                let params = merge_params(config.params_for(&r.name), r.params.as_ref());
                Route::new(key, r.name.clone(), params)
            })
            .collect();

        if routes.is_empty() {
            routes.push(self.initial_route(config));
        }
        let index = routes.len() - 1;
        debug!(routes = routes.len(), "stack state rehydrated");
        Ok(base::fresh_state(&*self.keys, STACK_ROUTER_TYPE, config, routes, index))
    }

    fn get_state_for_route_names_change(
        &self,
        state: &NavigationState,
        config: &RouteConfig,
    ) -> Result<NavigationState, NavigationError> {
        validate_route_names(&config.route_names)?;

        let mut routes: Vec<Route> = state
            .routes
            .iter()
            .filter(|r| config.contains(&r.name))
            .cloned()
            .collect();
        if routes.is_empty() {
            routes.push(self.initial_route(config));
        }

        let mut next = state.clone();
        next.index = routes.len() - 1;
        next.routes = routes;
        next.route_names = config.route_names.clone();
        Ok(next)
    }

    fn get_state_for_route_focus(&self, state: &NavigationState, key: &str) -> NavigationState {
        match state.position_of_key(key) {
            Some(position) => self.pop_to(state, position),
            None => state.clone(),
        }
    }

    fn get_state_for_action(
        &self,
        state: &NavigationState,
        action: &Action,
    ) -> Result<Option<NavigationState>, NavigationError> {
        let next = match action {
            Action::Navigate { name, key, params } => {
                self.navigate(state, name, key.as_deref(), params.as_ref())
            }
            Action::Push { name, params } => {
                if state.route_names.iter().any(|n| n == name) {
                    let route = Route::new(route_key(&*self.keys, name), name, params.clone());
                    Some(self.push(state, route))
                } else {
                    None
                }
            }
            Action::Pop { count } => {
                if state.index == 0 || *count == 0 {
                    None
                } else {
                    let popped = (*count).min(state.index);
                    Some(self.pop_to(state, state.index - popped))
                }
            }
            Action::PopToTop | Action::GoBack if state.index == 0 => None,
            Action::PopToTop => Some(self.pop_to(state, 0)),
            Action::GoBack => Some(self.pop_to(state, state.index - 1)),
            _ => base::get_state_for_action(state, action),
        };
        Ok(next)
    }

    fn should_action_change_focus(&self, action: &Action) -> bool {
        matches!(action, Action::Navigate { .. })
    }
}
