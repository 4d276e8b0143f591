//! Route and navigation-state data model.
//!
//! A [`NavigationState`] is an immutable snapshot: reducers take it by
//! reference and return a new value.  The same shape is shared by every
//! router; only the route type differs ([`Route`] for stack/tab/split,
//! [`ModalRoute`] for overlays, which also carries a stacking `order`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the sentinel route anchoring both the split and stacked layouts.
pub const MAIN_ROUTE_NAME: &str = "main";

/// Parameter key overlays use to expose their visibility to scenes.
pub(crate) const VISIBLE_PARAM: &str = "visible";

/// Route parameters: an arbitrary JSON object.
pub type Params = Map<String, Value>;

/// Shallow-merges `overlay` on top of `base`.
///
/// Returns `None` only when both sides are absent, so a route that never had
/// params does not grow an empty object.
pub fn merge_params(base: Option<&Params>, overlay: Option<&Params>) -> Option<Params> {
    match (base, overlay) {
        (None, None) => None,
        _ => {
            let mut merged = base.cloned().unwrap_or_default();
            if let Some(overlay) = overlay {
                for (k, v) in overlay {
                    merged.insert(k.clone(), v.clone());
                }
            }
            Some(merged)
        }
    }
}

/// Accessors shared by every route type so routers can be generic over them.
pub trait RouteLike: Clone {
    fn key(&self) -> &str;
    fn name(&self) -> &str;
    fn params(&self) -> Option<&Params>;
    fn params_mut(&mut self) -> &mut Option<Params>;
}

/// A single route instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Unique per route instance; stable until the route is destroyed.
    pub key: String,
    /// Screen type.  Unique within one router's route list.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl Route {
    pub fn new(key: impl Into<String>, name: impl Into<String>, params: Option<Params>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            params,
        }
    }

    /// Returns `true` if this is the `main` sentinel route.
    pub fn is_main(&self) -> bool {
        self.name == MAIN_ROUTE_NAME
    }
}

impl RouteLike for Route {
    fn key(&self) -> &str {
        &self.key
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }
    fn params_mut(&mut self) -> &mut Option<Params> {
        &mut self.params
    }
}

/// An overlay route.  `order == 0` means hidden; larger orders are more recent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalRoute {
    pub key: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    #[serde(default)]
    pub order: u64,
}

impl ModalRoute {
    pub fn new(key: impl Into<String>, name: impl Into<String>, params: Option<Params>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            params,
            order: 0,
        }
    }

    /// Reads the `visible` param; absent or non-boolean means hidden.
    pub fn is_visible(&self) -> bool {
        self.params
            .as_ref()
            .and_then(|p| p.get(VISIBLE_PARAM))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.params
            .get_or_insert_with(Params::new)
            .insert(VISIBLE_PARAM.to_string(), Value::Bool(visible));
    }
}

impl RouteLike for ModalRoute {
    fn key(&self) -> &str {
        &self.key
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }
    fn params_mut(&mut self) -> &mut Option<Params> {
        &mut self.params
    }
}

fn default_stale() -> bool {
    true
}

/// Navigation state owned by one router.
///
/// Invariant: `index < routes.len()` whenever `routes` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState<R = Route> {
    pub key: String,
    /// Router type tag.  Serialized as `type`.
    #[serde(rename = "type")]
    pub router_type: String,
    /// `true` for data (e.g. loaded from disk) not yet reconciled against the
    /// current route names.  Absent on the wire means stale.
    #[serde(default = "default_stale")]
    pub stale: bool,
    pub route_names: Vec<String>,
    pub routes: Vec<R>,
    #[serde(default)]
    pub index: usize,
    /// Tab router visit history (route keys, oldest first).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<String>,
}

impl<R: RouteLike> NavigationState<R> {
    /// The route currently holding focus.
    pub fn focused_route(&self) -> Option<&R> {
        self.routes.get(self.index)
    }

    pub fn position_of_key(&self, key: &str) -> Option<usize> {
        self.routes.iter().position(|r| r.key() == key)
    }

    pub fn position_of_name(&self, name: &str) -> Option<usize> {
        self.routes.iter().position(|r| r.name() == name)
    }

    pub fn route_named(&self, name: &str) -> Option<&R> {
        self.routes.iter().find(|r| r.name() == name)
    }

    /// Marks the state as requiring rehydration before use.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }
}

/// Which representation a [`SplitState`] currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Dual pane: `main` always visible, secondary pane shows the focused route.
    Split,
    /// Single focus with push/pop history rooted at `main`.
    Stacked,
}

impl SplitMode {
    pub fn from_flag(is_split: bool) -> Self {
        if is_split {
            SplitMode::Split
        } else {
            SplitMode::Stacked
        }
    }

    pub fn is_split(self) -> bool {
        self == SplitMode::Split
    }
}

/// Navigation state of a split navigator.
///
/// The representation mode, the "mode announced" flag and the current
/// initial route travel inside the state value so the split reducer stays a
/// pure function of `(state, action)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitState {
    #[serde(flatten)]
    pub navigation: NavigationState,
    pub mode: SplitMode,
    /// Set once the first `SET_SPLIT` (the mount-time announcement) arrived.
    #[serde(default)]
    pub mode_announced: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_route_name: Option<String>,
}

impl SplitState {
    pub fn is_split(&self) -> bool {
        self.mode.is_split()
    }

    pub fn focused_route(&self) -> Option<&Route> {
        self.navigation.focused_route()
    }

    pub fn main_route(&self) -> Option<&Route> {
        self.navigation.route_named(MAIN_ROUTE_NAME)
    }

    pub fn mark_stale(&mut self) {
        self.navigation.mark_stale();
    }
}

/// The route-name declaration a router reconciles states against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteConfig {
    pub route_names: Vec<String>,
    /// Initial params per route name.
    pub route_param_list: HashMap<String, Params>,
}

impl RouteConfig {
    pub fn new<I, S>(route_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            route_names: route_names.into_iter().map(Into::into).collect(),
            route_param_list: HashMap::new(),
        }
    }

    /// Sets the initial params for `name`.
    pub fn with_params(mut self, name: impl Into<String>, params: Params) -> Self {
        self.route_param_list.insert(name.into(), params);
        self
    }

    pub fn params_for(&self, name: &str) -> Option<&Params> {
        self.route_param_list.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.route_names.iter().any(|n| n == name)
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.route_names.iter().position(|n| n == name)
    }
}
