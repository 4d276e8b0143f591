//! Integration tests for overlay presentation.
//!
//! Exercises `ModalController` + `ModalContext` end-to-end with overlays
//! declared in TOML, using a recording overlay host in place of a real
//! renderer.

use std::sync::{Arc, Mutex};

use serde_json::json;
use surf_core::{ModalRouter, Params, SequentialKeyGenerator};
use surf_navigator::application::modal_controller::{ModalContext, ModalController, OverlayHost};
use surf_navigator::application::navigator::Navigator;
use surf_navigator::infrastructure::storage::config::AppConfig;

// ── Recording host ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum HostEvent {
    Render(String),
    Present(String, Params),
    Dismiss(String),
}

/// Overlay host that appends every call to a shared log.
#[derive(Clone, Default)]
struct RecordingHost {
    events: Arc<Mutex<Vec<HostEvent>>>,
}

impl RecordingHost {
    fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Presence transitions only, as `(kind, key)`.
    fn transitions(&self) -> Vec<(&'static str, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::Present(key, _) => Some(("present", key)),
                HostEvent::Dismiss(key) => Some(("dismiss", key)),
                HostEvent::Render(_) => None,
            })
            .collect()
    }

    fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl OverlayHost for RecordingHost {
    fn render(&mut self, key: &str) {
        self.events.lock().unwrap().push(HostEvent::Render(key.to_string()));
    }

    fn present(&mut self, key: &str, params: &Params) {
        self.events
            .lock()
            .unwrap()
            .push(HostEvent::Present(key.to_string(), params.clone()));
    }

    fn dismiss(&mut self, key: &str) {
        self.events.lock().unwrap().push(HostEvent::Dismiss(key.to_string()));
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

const OVERLAY_CONFIG: &str = r#"
[[overlays]]
kind = "overlay"
name = "menu"
default_props = { animated = true }

[[overlays]]
kind = "group"
children = [{ kind = "overlay", name = "alert" }]
"#;

/// Mounts a controller for the overlays above.  Keys are `menu-0` and
/// `alert-1`.
fn mounted_context() -> (ModalContext, RecordingHost) {
    let config: AppConfig = toml::from_str(OVERLAY_CONFIG).expect("overlay config must parse");
    let router = ModalRouter::new(config.modal_router_options(), SequentialKeyGenerator::shared())
        .unwrap();
    let route_config = router.route_config();
    let navigator = Navigator::new(router, route_config).unwrap();

    let host = RecordingHost::default();
    let context = ModalContext::new();
    context.mount(ModalController::new(navigator, Box::new(host.clone())));
    host.clear();
    (context, host)
}

fn params(value: serde_json::Value) -> Params {
    value.as_object().cloned().unwrap_or_default()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_mount_renders_hidden_overlays_without_presenting() {
    let config: AppConfig = toml::from_str(OVERLAY_CONFIG).unwrap();
    let router = ModalRouter::new(config.modal_router_options(), SequentialKeyGenerator::shared())
        .unwrap();
    let route_config = router.route_config();
    let host = RecordingHost::default();

    ModalContext::new().mount(ModalController::new(
        Navigator::new(router, route_config).unwrap(),
        Box::new(host.clone()),
    ));

    assert_eq!(
        host.events(),
        vec![
            HostEvent::Render("menu-0".to_string()),
            HostEvent::Render("alert-1".to_string()),
        ]
    );
}

#[test]
fn test_show_presents_with_default_props_merged_under_caller_params() {
    let (context, host) = mounted_context();

    assert!(context.show("menu", Some(params(json!({"id": 1})))).unwrap());

    assert_eq!(
        host.events(),
        vec![
            HostEvent::Render("alert-1".to_string()),
            HostEvent::Render("menu-0".to_string()),
            HostEvent::Present(
                "menu-0".to_string(),
                params(json!({"animated": true, "id": 1, "visible": true}))
            ),
        ]
    );
}

#[test]
fn test_presence_transitions_follow_recency() {
    // Arrange
    let (context, host) = mounted_context();

    // Act
    context.show("menu", None).unwrap();
    context.show("alert", None).unwrap();
    assert!(context.go_back().unwrap());
    context.show("menu", None).unwrap();
    context.hide_all().unwrap();

    // Assert
    assert_eq!(
        host.transitions(),
        vec![
            ("present", "menu-0".to_string()),
            ("present", "alert-1".to_string()),
            ("dismiss", "alert-1".to_string()),
            ("dismiss", "menu-0".to_string()),
        ]
    );
    let last_pass: Vec<HostEvent> = host.events().into_iter().rev().take(3).collect();
    assert_eq!(
        last_pass,
        vec![
            HostEvent::Dismiss("menu-0".to_string()),
            HostEvent::Render("menu-0".to_string()),
            HostEvent::Render("alert-1".to_string()),
        ],
        "the most recently shown overlay renders last"
    );
}

#[test]
fn test_go_back_without_visible_overlay_is_not_handled() {
    let (context, host) = mounted_context();

    assert!(!context.go_back().unwrap());
    assert!(host.events().is_empty());
}

#[test]
fn test_close_after_hide_all_is_not_handled() {
    // Arrange
    let (context, host) = mounted_context();
    context.show("menu", None).unwrap();
    context.show("alert", None).unwrap();
    context.hide_all().unwrap();
    host.clear();

    // Act
    let handled = context.go_back().unwrap();

    // Assert
    assert!(!handled);
    assert!(host.events().is_empty());
}

#[test]
fn test_contexts_are_scoped_to_their_own_tree() {
    // Arrange
    let (mounted, host) = mounted_context();
    let other = ModalContext::new();

    // Act
    let shown_elsewhere = other.show("menu", None).unwrap();

    // Assert
    assert!(!shown_elsewhere);
    assert!(host.events().is_empty());
    let visible = mounted
        .with_controller(|c| c.state().routes.iter().any(|r| r.is_visible()))
        .unwrap();
    assert!(!visible);
}
