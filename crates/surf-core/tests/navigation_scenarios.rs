//! Integration tests for the surf-core reducers.
//!
//! These tests drive the routers only through the public API, replaying the
//! end-to-end scenarios a host goes through: mount, announce the layout,
//! navigate, resize, show and hide overlays.

use serde_json::json;
use surf_core::{
    Action, Declaration, ModalRouter, ModalRouterOptions, ModalState, NavigationError,
    RouteConfig, Router, SequentialKeyGenerator, SplitMode, SplitRouter, SplitRouterOptions,
    SplitState,
};

fn split_router(is_split: bool) -> SplitRouter {
    SplitRouter::new(
        SplitRouterOptions {
            is_split,
            ..Default::default()
        },
        SequentialKeyGenerator::shared(),
    )
}

fn dispatch<R: Router>(router: &R, state: &R::State, action: Action) -> R::State {
    router
        .get_state_for_action(state, &action)
        .expect("no configuration error")
        .expect("action should be handled")
}

fn focused_name(state: &SplitState) -> String {
    state
        .focused_route()
        .map(|r| r.name.clone())
        .unwrap_or_default()
}

fn modal_names(state: &ModalState) -> Vec<String> {
    state.routes.iter().map(|r| r.name.clone()).collect()
}

#[test]
fn test_stacked_first_then_split_focuses_first() {
    // Arrange: stacked navigator focused on "first"
    let router = split_router(false);
    let config = RouteConfig::new(["main", "first", "second"]);
    let state = router.get_initial_state(&config).unwrap();
    let state = dispatch(&router, &state, Action::set_split(false, None));
    let state = dispatch(&router, &state, Action::navigate("first"));

    // Act
    let split = dispatch(
        &router,
        &state,
        Action::set_split(true, Some("first".to_string())),
    );

    // Assert
    let names: Vec<_> = split.navigation.routes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["main", "first", "second"]);
    assert_eq!(focused_name(&split), "first");
    let main_position = split.navigation.position_of_name("main").unwrap();
    assert_ne!(split.navigation.index, main_position);
}

#[test]
fn test_split_second_then_stacked_keeps_two_frames() {
    // Arrange
    let router = split_router(true);
    let config = RouteConfig::new(["main", "first", "second"]);
    let state = router.get_initial_state(&config).unwrap();
    let state = dispatch(&router, &state, Action::set_split(true, None));
    let state = dispatch(&router, &state, Action::jump_to("second"));

    // Act
    let stacked = dispatch(&router, &state, Action::set_split(false, None));

    // Assert
    let names: Vec<_> = stacked.navigation.routes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["main", "second"]);
    assert_eq!(stacked.navigation.index, 1);
    assert_eq!(stacked.mode, SplitMode::Stacked);
}

#[test]
fn test_resize_sequence_last_one_wins() {
    let router = split_router(false);
    let config = RouteConfig::new(["main", "inbox", "settings"]);
    let mut state = router.get_initial_state(&config).unwrap();
    state = dispatch(&router, &state, Action::set_split(false, None));
    state = dispatch(&router, &state, Action::navigate("settings"));

    for is_split in [true, false, true, true, false, true] {
        state = dispatch(&router, &state, Action::set_split(is_split, None));
    }

    assert!(state.is_split());
    assert_eq!(focused_name(&state), "settings");
    assert_eq!(state.navigation.router_type, "surf");
}

#[test]
fn test_split_state_survives_json_snapshot() {
    // Arrange
    let router = split_router(true);
    let config = RouteConfig::new(["main", "inbox", "settings"]);
    let state = router.get_initial_state(&config).unwrap();
    let state = dispatch(&router, &state, Action::jump_to("settings"));

    // Act
    let raw = serde_json::to_string(&state).unwrap();
    let mut restored: SplitState = serde_json::from_str(&raw).unwrap();
    restored.mark_stale();
    let rehydrated = router.get_rehydrated_state(&restored, &config).unwrap();

    // Assert
    assert_eq!(focused_name(&rehydrated), "settings");
    assert_eq!(
        rehydrated.focused_route().map(|r| r.key.clone()),
        state.focused_route().map(|r| r.key.clone())
    );
}

#[test]
fn test_missing_main_is_a_configuration_error() {
    let router = split_router(true);
    let result = router.get_initial_state(&RouteConfig::new(["inbox"]));
    assert_eq!(result.unwrap_err(), NavigationError::MissingMainRoute);
}

#[test]
fn test_overlays_show_show_hide() {
    // Arrange
    let router = ModalRouter::new(
        ModalRouterOptions {
            declarations: vec![Declaration::overlay("a"), Declaration::overlay("b")],
        },
        SequentialKeyGenerator::shared(),
    )
    .unwrap();
    let state = router.get_initial_state(&router.route_config()).unwrap();
    assert_eq!(state.index, 0);

    // Act
    let state = dispatch(&router, &state, Action::show("a", None));
    let state = dispatch(&router, &state, Action::show("b", None));
    let state = dispatch(&router, &state, Action::hide("a"));

    // Assert
    let a = state.route_named("a").unwrap();
    let b = state.route_named("b").unwrap();
    assert_eq!((a.order, a.is_visible()), (0, false));
    assert_eq!((b.order, b.is_visible()), (2, true));
    assert_eq!(state.routes[state.index].name, "b");
}

#[test]
fn test_overlay_params_reach_the_route() {
    let defaults = json!({"animated": true}).as_object().cloned().unwrap();
    let router = ModalRouter::new(
        ModalRouterOptions {
            declarations: vec![Declaration::group(vec![
                Declaration::overlay_with_defaults("share", defaults),
                Declaration::overlay("menu"),
            ])],
        },
        SequentialKeyGenerator::shared(),
    )
    .unwrap();
    let state = router.get_initial_state(&router.route_config()).unwrap();

    let state = dispatch(
        &router,
        &state,
        Action::show("share", json!({"url": "https://example.org"}).as_object().cloned()),
    );

    let share = state.route_named("share").unwrap();
    let params = share.params.as_ref().unwrap();
    assert_eq!(params["animated"], json!(true));
    assert_eq!(params["url"], json!("https://example.org"));
    assert_eq!(params["visible"], json!(true));
    assert_eq!(modal_names(&state), vec!["menu", "share"]);
}
