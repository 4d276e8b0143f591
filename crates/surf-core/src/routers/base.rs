//! Behaviour shared by every router.

use crate::domain::keys::{route_key, state_key, KeyGenerator};
use crate::domain::model::{merge_params, NavigationState, Params, Route, RouteConfig, RouteLike};
use crate::protocol::action::Action;

/// Handles the actions every router understands.  Currently only
/// `SET_PARAMS`; anything else is not handled.
pub fn get_state_for_action<R: RouteLike>(
    state: &NavigationState<R>,
    action: &Action,
) -> Option<NavigationState<R>> {
    match action {
        Action::SetParams { key, params } => set_params(state, key.as_deref(), params),
        _ => None,
    }
}

/// Merges `params` into the route with `key`, or the focused route.
pub fn set_params<R: RouteLike>(
    state: &NavigationState<R>,
    key: Option<&str>,
    params: &Params,
) -> Option<NavigationState<R>> {
    let position = match key {
        Some(key) => state.position_of_key(key)?,
        None => {
            state.focused_route()?;
            state.index
        }
    };

    let mut next = state.clone();
    let route = &mut next.routes[position];
    let merged = merge_params(route.params(), Some(params));
    *route.params_mut() = merged;
    Some(next)
}

/// A route with a freshly generated key and the declared initial params.
pub(crate) fn fresh_route(keys: &dyn KeyGenerator, name: &str, config: &RouteConfig) -> Route {
    Route::new(route_key(keys, name), name, config.params_for(name).cloned())
}

/// Builds an empty, reconciled state shell tagged `router_type`.
pub(crate) fn fresh_state<R>(
    keys: &dyn KeyGenerator,
    router_type: &str,
    config: &RouteConfig,
    routes: Vec<R>,
    index: usize,
) -> NavigationState<R> {
    NavigationState {
        key: state_key(keys, router_type),
        router_type: router_type.to_string(),
        stale: false,
        route_names: config.route_names.clone(),
        routes,
        index,
        history: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::keys::SequentialKeyGenerator;
    use serde_json::json;

    fn sample_state() -> NavigationState {
        let keys = SequentialKeyGenerator::new();
        let config = RouteConfig::new(["main", "inbox"]);
        let routes = vec![
            fresh_route(&keys, "main", &config),
            fresh_route(&keys, "inbox", &config),
        ];
        fresh_state(&keys, "tab", &config, routes, 1)
    }

    #[test]
    fn test_set_params_without_key_targets_focused_route() {
        // Arrange
        let state = sample_state();
        let params = json!({"filter": "unread"}).as_object().cloned().unwrap();

        // Act
        let next = set_params(&state, None, &params).unwrap();

        // Assert
        assert_eq!(next.routes[1].params, Some(params));
        assert_eq!(next.routes[0].params, None);
        assert_eq!(state.routes[1].params, None, "input must not be mutated");
    }

    #[test]
    fn test_set_params_unknown_key_is_not_handled() {
        let state = sample_state();
        let action = Action::SetParams {
            key: Some("nope".to_string()),
            params: Params::new(),
        };
        assert_eq!(get_state_for_action(&state, &action), None);
    }

    #[test]
    fn test_base_ignores_other_actions() {
        let state = sample_state();
        assert_eq!(get_state_for_action(&state, &Action::GoBack), None);
    }

    #[test]
    fn test_fresh_state_is_not_stale() {
        let state = sample_state();
        assert!(!state.stale);
        assert_eq!(state.key, "tab-2");
        assert_eq!(state.routes[0].key, "main-0");
    }
}
