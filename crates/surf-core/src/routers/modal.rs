//! Overlay router.
//!
//! Every declared overlay has exactly one route.  A route's `order` says how
//! recently it was brought to the front: `0` means hidden, and among visible
//! overlays the largest order is the topmost one.  After every `SHOW` the
//! route list is sorted ascending by order, so rendering the routes in array
//! order paints the frontmost overlay last.
//!
//! # Invariants
//!
//! - No two routes ever share a positive order.  Orders come from the
//!   router's own [`OrderCounter`], which only moves forward.
//! - `index` points at the route with the largest positive order, or at `0`
//!   when every order is zero (right after `HIDE_ALL` it is always `0`).
//! - `HIDE` is idempotent.

use tracing::debug;

use super::base;
use super::Router;
use crate::domain::declaration::{overlay_configs, validate_route_names, Declaration, OverlayConfig};
use crate::domain::error::NavigationError;
use crate::domain::keys::{route_key, state_key, SharedKeyGenerator};
use crate::domain::model::{merge_params, ModalRoute, NavigationState, Params, RouteConfig};
use crate::protocol::action::Action;
use crate::protocol::order::OrderCounter;

pub const MODAL_ROUTER_TYPE: &str = "surf-modals";

/// Navigation state of a modal navigator.
pub type ModalState = NavigationState<ModalRoute>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalRouterOptions {
    /// Overlay declarations, flattened once at construction.
    pub declarations: Vec<Declaration>,
}

#[derive(Debug)]
pub struct ModalRouter {
    configs: Vec<OverlayConfig>,
    counter: OrderCounter,
    keys: SharedKeyGenerator,
}

impl ModalRouter {
    /// # Errors
    ///
    /// Fails if a declaration is not an overlay (or a group of overlays), or
    /// if two overlays share a name.
    pub fn new(options: ModalRouterOptions, keys: SharedKeyGenerator) -> Result<Self, NavigationError> {
        let configs = overlay_configs(&options.declarations)?;
        Ok(Self {
            configs,
            counter: OrderCounter::new(),
            keys,
        })
    }

    /// Route names in declaration order.
    pub fn route_config(&self) -> RouteConfig {
        RouteConfig::new(self.configs.iter().map(|c| c.name.clone()))
    }

    pub fn overlay_configs(&self) -> &[OverlayConfig] {
        &self.configs
    }

    fn default_props(&self, name: &str) -> Option<&Params> {
        self.configs
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.default_props.as_ref())
    }

    fn fresh_route(&self, name: &str, config: &RouteConfig) -> ModalRoute {
        ModalRoute::new(route_key(&*self.keys, name), name, config.params_for(name).cloned())
    }

    /// Brings the route at `position` to the front.
    fn bring_to_front(
        &self,
        state: &ModalState,
        position: Option<usize>,
        params: Option<&Params>,
    ) -> Option<ModalState> {
        let position = position?;
        let target_key = state.routes[position].key.clone();
        let order = self.counter.next();

        let mut routes: Vec<ModalRoute> = state
            .routes
            .iter()
            .enumerate()
            .map(|(i, route)| {
                let mut route = route.clone();
                if i == position {
                    route.order = order;
                    route.params = merge_params(self.default_props(&route.name), params);
                    route.set_visible(true);
                } else {
                    let visible = route.order > 0;
                    route.set_visible(visible);
                }
                route
            })
            .collect();
        routes.sort_by_key(|r| r.order);

        let index = routes.iter().position(|r| r.key == target_key)?;
        debug!(overlay = %routes[index].name, order, "overlay brought to front");

        let mut next = state.clone();
        next.routes = routes;
        next.index = index;
        Some(next)
    }

    fn hide(&self, state: &ModalState, position: usize) -> ModalState {
        let mut next = state.clone();
        let route = &mut next.routes[position];
        route.order = 0;
        route.set_visible(false);
        next.index = highest_order_position(&next.routes).unwrap_or(0);
        next
    }

    fn hide_all(&self, state: &ModalState) -> ModalState {
        let mut next = state.clone();
        for route in &mut next.routes {
            route.set_visible(false);
        }
        next.index = 0;
        next
    }
}

/// Position of the route with the largest positive order.
pub fn highest_order_position(routes: &[ModalRoute]) -> Option<usize> {
    routes
        .iter()
        .enumerate()
        .filter(|(_, r)| r.order > 0)
        .max_by_key(|(_, r)| r.order)
        .map(|(i, _)| i)
}

/// Position of the frontmost overlay that is currently shown.  Orders
/// survive `HIDE_ALL`, so a positive order alone does not mean visible.
pub fn topmost_visible_position(routes: &[ModalRoute]) -> Option<usize> {
    routes
        .iter()
        .enumerate()
        .filter(|(_, r)| r.order > 0 && r.is_visible())
        .max_by_key(|(_, r)| r.order)
        .map(|(i, _)| i)
}

impl Router for ModalRouter {
    type State = ModalState;

    fn router_type(&self) -> &'static str {
        MODAL_ROUTER_TYPE
    }

    fn get_initial_state(&self, config: &RouteConfig) -> Result<ModalState, NavigationError> {
        validate_route_names(&config.route_names)?;
        let routes = config
            .route_names
            .iter()
            .map(|name| self.fresh_route(name, config))
            .collect();
        Ok(base::fresh_state(&*self.keys, MODAL_ROUTER_TYPE, config, routes, 0))
    }

    fn get_rehydrated_state(
        &self,
        state: &ModalState,
        config: &RouteConfig,
    ) -> Result<ModalState, NavigationError> {
        if !state.stale {
            return Ok(state.clone());
        }
        validate_route_names(&config.route_names)?;

        let routes = config
            .route_names
            .iter()
            .map(|name| match state.route_named(name) {
                Some(stored) => {
                    let key = if stored.key.is_empty() {
                        route_key(&*self.keys, name)
                    } else {
                        stored.key.clone()
                    };
                    let params = merge_params(config.params_for(name), stored.params.as_ref());
                    ModalRoute::new(key, name.clone(), params)
                }
                None => self.fresh_route(name, config),
            })
            .collect();

        Ok(ModalState {
            key: state_key(&*self.keys, MODAL_ROUTER_TYPE),
            router_type: MODAL_ROUTER_TYPE.to_string(),
            stale: false,
            route_names: config.route_names.clone(),
            routes,
            index: 0,
            history: Vec::new(),
        })
    }

    fn get_state_for_route_names_change(
        &self,
        state: &ModalState,
        config: &RouteConfig,
    ) -> Result<ModalState, NavigationError> {
        validate_route_names(&config.route_names)?;

        let routes: Vec<ModalRoute> = config
            .route_names
            .iter()
            .map(|name| {
                state
                    .route_named(name)
                    .cloned()
                    .unwrap_or_else(|| self.fresh_route(name, config))
            })
            .collect();
        let index = highest_order_position(&routes).unwrap_or(0);

        let mut next = state.clone();
        next.route_names = config.route_names.clone();
        next.routes = routes;
        next.index = index;
        Ok(next)
    }

    fn get_state_for_route_focus(&self, state: &ModalState, key: &str) -> ModalState {
        let mut next = state.clone();
        if let Some(position) = state.position_of_key(key) {
            next.index = position;
        }
        next
    }

    fn get_state_for_action(
        &self,
        state: &ModalState,
        action: &Action,
    ) -> Result<Option<ModalState>, NavigationError> {
        let next = match action {
            Action::Show { name, params } | Action::JumpTo { name, params } => {
                self.bring_to_front(state, state.position_of_name(name), params.as_ref())
            }
            Action::Navigate { name, key, params } => {
                let position = match key {
                    Some(key) => state.position_of_key(key),
                    None => state.position_of_name(name),
                };
                self.bring_to_front(state, position, params.as_ref())
            }
            Action::Hide { name } => state
                .position_of_name(name)
                .map(|position| self.hide(state, position)),
            Action::HideAll => Some(self.hide_all(state)),
            Action::GoBack => {
                topmost_visible_position(&state.routes).map(|position| self.hide(state, position))
            }
            _ => base::get_state_for_action(state, action),
        };
        Ok(next)
    }

    fn should_action_change_focus(&self, action: &Action) -> bool {
        matches!(action, Action::Navigate { .. } | Action::Show { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::keys::SequentialKeyGenerator;
    use serde_json::{json, Value};

    fn router(names: &[&str]) -> ModalRouter {
        let declarations = names.iter().map(|n| Declaration::overlay(*n)).collect();
        ModalRouter::new(ModalRouterOptions { declarations }, SequentialKeyGenerator::shared())
            .unwrap()
    }

    fn initial(router: &ModalRouter) -> ModalState {
        router.get_initial_state(&router.route_config()).unwrap()
    }

    fn apply(router: &ModalRouter, state: &ModalState, action: Action) -> ModalState {
        router
            .get_state_for_action(state, &action)
            .unwrap()
            .expect("action should be handled")
    }

    fn route<'a>(state: &'a ModalState, name: &str) -> &'a ModalRoute {
        state.route_named(name).unwrap()
    }

    fn focused_name(state: &ModalState) -> &str {
        &state.routes[state.index].name
    }

    fn assert_order_invariant(state: &ModalState) {
        let mut orders: Vec<u64> = state
            .routes
            .iter()
            .map(|r| r.order)
            .filter(|o| *o > 0)
            .collect();
        let count = orders.len();
        orders.dedup();
        assert_eq!(orders.len(), count, "positive orders must be unique");
        if let Some(top) = highest_order_position(&state.routes) {
            assert_eq!(state.index, top);
        }
    }

    #[test]
    fn test_new_rejects_screen_declarations() {
        let options = ModalRouterOptions {
            declarations: vec![Declaration::overlay("a"), Declaration::screen("b")],
        };
        let result = ModalRouter::new(options, SequentialKeyGenerator::shared());
        assert!(matches!(
            result,
            Err(NavigationError::InvalidDeclaration { found: "Screen", .. })
        ));
    }

    #[test]
    fn test_initial_state_is_all_hidden() {
        let router = router(&["a", "b"]);
        let state = initial(&router);
        assert_eq!(state.router_type, "surf-modals");
        assert_eq!(state.index, 0);
        assert!(state.routes.iter().all(|r| r.order == 0 && !r.is_visible()));
    }

    #[test]
    fn test_show_show_hide_sequence() {
        // Arrange
        let router = router(&["a", "b"]);
        let state = initial(&router);

        // Act + Assert: SHOW a
        let state = apply(&router, &state, Action::show("a", None));
        assert_eq!(route(&state, "a").order, 1);
        assert!(route(&state, "a").is_visible());
        assert_eq!(focused_name(&state), "a");

        // SHOW b
        let state = apply(&router, &state, Action::show("b", None));
        assert_eq!(route(&state, "b").order, 2);
        assert_eq!(focused_name(&state), "b");
        assert_eq!(route(&state, "a").order, 1);
        assert!(route(&state, "a").is_visible());

        // HIDE a
        let state = apply(&router, &state, Action::hide("a"));
        assert_eq!(route(&state, "a").order, 0);
        assert!(!route(&state, "a").is_visible());
        assert_eq!(focused_name(&state), "b");
    }

    #[test]
    fn test_routes_are_sorted_by_order_after_show() {
        let router = router(&["a", "b", "c"]);
        let state = initial(&router);
        let state = apply(&router, &state, Action::show("c", None));
        let state = apply(&router, &state, Action::show("a", None));

        let names: Vec<_> = state.routes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
        assert_eq!(state.index, 2);
    }

    #[test]
    fn test_reshowing_visible_overlay_bumps_order() {
        let router = router(&["a", "b"]);
        let mut state = initial(&router);
        for name in ["a", "b", "a", "a", "b"] {
            state = apply(&router, &state, Action::show(name, None));
            assert_order_invariant(&state);
        }
        assert_eq!(route(&state, "b").order, 5);
        assert_eq!(route(&state, "a").order, 4);
    }

    #[test]
    fn test_show_replaces_params_with_defaults_and_action_params() {
        // Arrange
        let defaults = json!({"title": "Share", "count": 0}).as_object().cloned().unwrap();
        let options = ModalRouterOptions {
            declarations: vec![Declaration::overlay_with_defaults("share", defaults)],
        };
        let router = ModalRouter::new(options, SequentialKeyGenerator::shared()).unwrap();
        let state = initial(&router);
        let first = json!({"count": 3, "stale": true}).as_object().cloned();
        let second = json!({"count": 4}).as_object().cloned();

        // Act
        let state = apply(&router, &state, Action::show("share", first));
        let state = apply(&router, &state, Action::show("share", second));

        // Assert
        let params = route(&state, "share").params.clone().unwrap();
        assert_eq!(params.get("title"), Some(&json!("Share")));
        assert_eq!(params.get("count"), Some(&json!(4)));
        assert_eq!(params.get("visible"), Some(&Value::Bool(true)));
        assert_eq!(params.get("stale"), None);
    }

    #[test]
    fn test_show_unknown_overlay_is_not_handled() {
        let router = router(&["a"]);
        let state = initial(&router);
        assert_eq!(
            router.get_state_for_action(&state, &Action::show("zzz", None)).unwrap(),
            None
        );
        assert_eq!(router.get_state_for_action(&state, &Action::hide("zzz")).unwrap(), None);
    }

    #[test]
    fn test_hide_is_idempotent() {
        let router = router(&["a", "b"]);
        let state = initial(&router);
        let state = apply(&router, &state, Action::show("a", None));
        let state = apply(&router, &state, Action::show("b", None));

        let once = apply(&router, &state, Action::hide("b"));
        let twice = apply(&router, &once, Action::hide("b"));

        assert_eq!(once, twice);
        assert_eq!(focused_name(&once), "a");
    }

    #[test]
    fn test_hide_of_never_shown_overlay_still_clears_it() {
        let router = router(&["a", "b"]);
        let state = initial(&router);
        let next = apply(&router, &state, Action::hide("b"));
        assert_eq!(route(&next, "b").order, 0);
        assert!(!route(&next, "b").is_visible());
        assert_eq!(next.index, 0);
    }

    #[test]
    fn test_hide_all_keeps_orders() {
        let router = router(&["a", "b"]);
        let state = initial(&router);
        let state = apply(&router, &state, Action::show("a", None));
        let state = apply(&router, &state, Action::show("b", None));

        let hidden = apply(&router, &state, Action::HideAll);

        assert!(hidden.routes.iter().all(|r| !r.is_visible()));
        assert_eq!(route(&hidden, "a").order, 1);
        assert_eq!(route(&hidden, "b").order, 2);
        assert_eq!(hidden.index, 0);
    }

    #[test]
    fn test_go_back_hides_topmost() {
        // Arrange
        let router = router(&["a", "b"]);
        let state = initial(&router);
        let state = apply(&router, &state, Action::show("a", None));
        let state = apply(&router, &state, Action::show("b", None));

        // Act
        let back = apply(&router, &state, Action::GoBack);
        let back_again = apply(&router, &back, Action::GoBack);

        // Assert
        assert!(!route(&back, "b").is_visible());
        assert_eq!(focused_name(&back), "a");
        assert_eq!(back_again.index, 0);
        assert!(back_again.routes.iter().all(|r| r.order == 0));
        assert_eq!(router.get_state_for_action(&back_again, &Action::GoBack).unwrap(), None);
    }

    #[test]
    fn test_go_back_after_hide_all_is_not_handled() {
        // Arrange
        let router = router(&["a", "b"]);
        let state = initial(&router);
        let state = apply(&router, &state, Action::show("a", None));
        let state = apply(&router, &state, Action::show("b", None));
        let hidden = apply(&router, &state, Action::HideAll);

        // Act
        let result = router.get_state_for_action(&hidden, &Action::GoBack).unwrap();

        // Assert
        assert_eq!(result, None);
    }

    #[test]
    fn test_navigate_by_key_shows_overlay() {
        let router = router(&["a", "b"]);
        let state = initial(&router);
        let key = route(&state, "b").key.clone();

        let next = apply(
            &router,
            &state,
            Action::Navigate {
                name: "ignored".to_string(),
                key: Some(key),
                params: None,
            },
        );

        assert_eq!(focused_name(&next), "b");
        assert!(route(&next, "b").is_visible());
    }

    #[test]
    fn test_rehydrate_resets_orders_and_keeps_keys() {
        // Arrange
        let router = router(&["a", "b"]);
        let mut stored = initial(&router);
        stored = apply(&router, &stored, Action::show("b", None));
        stored.mark_stale();

        // Act
        let state = router
            .get_rehydrated_state(&stored, &RouteConfig::new(["a", "b", "c"]))
            .unwrap();

        // Assert
        assert!(!state.stale);
        assert!(state.routes.iter().all(|r| r.order == 0));
        assert_eq!(route(&state, "b").key, route(&stored, "b").key);
        assert_eq!(state.index, 0);
        assert_eq!(state.routes.len(), 3);
    }

    #[test]
    fn test_route_names_change_follows_topmost_overlay() {
        let router = router(&["a", "b"]);
        let state = initial(&router);
        let state = apply(&router, &state, Action::show("a", None));

        let next = router
            .get_state_for_route_names_change(&state, &RouteConfig::new(["c", "b", "a"]))
            .unwrap();

        assert_eq!(focused_name(&next), "a");
        assert_eq!(route(&next, "c").order, 0);
    }

    #[test]
    fn test_focus_policy() {
        let router = router(&["a"]);
        assert!(router.should_action_change_focus(&Action::show("a", None)));
        assert!(router.should_action_change_focus(&Action::navigate("a")));
        assert!(!router.should_action_change_focus(&Action::hide("a")));
        assert!(!router.should_action_change_focus(&Action::jump_to("a")));
    }
}
