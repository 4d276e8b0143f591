//! LayoutBridge: connects viewport measurements to the split navigator.
//!
//! The bridge is an observer, not a reducer.  It watches viewport sizes,
//! decides whether the layout is split (`width > main_width`) and emits a
//! `SET_SPLIT` action the first time and whenever that answer changes.  It
//! also remembers every focus index it has seen so secondary scenes are
//! mounted lazily and never unmounted again (their local state survives
//! focus changes).
//!
//! # Resize flow
//!
//! ```text
//! ViewportSource ──► mpsc channel ──► pump_viewport_changes
//!                                         │
//!                                         ▼
//!                           SplitNavigator::resize(viewport)
//!                              ├─ LayoutBridge::observe  → Option<SET_SPLIT>
//!                              ├─ Navigator::dispatch
//!                              └─ LayoutBridge::record_focus
//! ```
//!
//! Observations are applied strictly in the order they arrive.  There is no
//! debouncing: a burst of resizes produces a burst of `SET_SPLIT` actions and
//! the last one wins.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use surf_core::{Action, NavigationError, Route, SplitRouter, SplitState};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use super::navigator::Navigator;

/// Width (in logical pixels) at or below which the layout is stacked.
pub const DEFAULT_MAIN_WIDTH: u32 = 600;

/// A viewport size observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `true` when the viewport is strictly wider than `main_width`.
    pub fn is_split(&self, main_width: u32) -> bool {
        self.width > main_width
    }
}

/// One secondary-pane scene in a split render plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub key: String,
    pub name: String,
    pub focused: bool,
}

/// What the host should draw for the current split state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderPlan {
    /// `main` in the primary pane, mounted scenes stacked in the secondary
    /// pane with exactly one of them focused.
    Split { main: String, scenes: Vec<Scene> },
    /// Route keys from root to top; `focused` is the visible one.
    Stacked { routes: Vec<String>, focused: String },
}

/// Observes viewports and tracks lazily mounted scenes.
#[derive(Debug, Clone)]
pub struct LayoutBridge {
    main_width: u32,
    initial_route_name: Option<String>,
    is_split: Option<bool>,
    visited: BTreeSet<usize>,
}

impl LayoutBridge {
    pub fn new(main_width: u32, initial_route_name: Option<String>) -> Self {
        Self {
            main_width,
            initial_route_name,
            is_split: None,
            visited: BTreeSet::new(),
        }
    }

    pub fn main_width(&self) -> u32 {
        self.main_width
    }

    /// The last computed split flag, `None` before the first observation.
    pub fn is_split(&self) -> Option<bool> {
        self.is_split
    }

    /// Records a viewport observation.
    ///
    /// Returns the `SET_SPLIT` action to dispatch, or `None` when the split
    /// flag did not change.
    pub fn observe(&mut self, viewport: Viewport) -> Option<Action> {
        let is_split = viewport.is_split(self.main_width);
        if self.is_split == Some(is_split) {
            return None;
        }
        self.is_split = Some(is_split);
        debug!(width = viewport.width, is_split, "layout breakpoint crossed");

        let initial_route_name = if is_split {
            self.initial_route_name.clone()
        } else {
            None
        };
        Some(Action::set_split(is_split, initial_route_name))
    }

    /// Remembers the focused index of `state`.
    pub fn record_focus(&mut self, state: &SplitState) {
        self.visited.insert(state.navigation.index);
    }

    /// Indices focused at least once, ascending.
    pub fn visited(&self) -> impl Iterator<Item = usize> + '_ {
        self.visited.iter().copied()
    }

    /// A secondary scene is mounted once it has been focused, and stays
    /// mounted.  The focused scene is always mounted.
    pub fn should_mount(&self, index: usize, state: &SplitState) -> bool {
        state.navigation.index == index || self.visited.contains(&index)
    }

    /// Builds the render plan for `state`.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::MissingMainRoute`] when a split state has
    /// no `main` route to put in the primary pane.
    pub fn render_plan(&self, state: &SplitState) -> Result<RenderPlan, NavigationError> {
        let navigation = &state.navigation;
        if state.is_split() {
            let main = state.main_route().ok_or(NavigationError::MissingMainRoute)?;
            let scenes = navigation
                .routes
                .iter()
                .enumerate()
                .filter(|(_, route)| route.key != main.key)
                .filter(|(index, _)| self.should_mount(*index, state))
                .map(|(index, route)| Scene {
                    key: route.key.clone(),
                    name: route.name.clone(),
                    focused: index == navigation.index,
                })
                .collect();
            Ok(RenderPlan::Split {
                main: main.key.clone(),
                scenes,
            })
        } else {
            let focused = navigation
                .focused_route()
                .map(|r: &Route| r.key.clone())
                .unwrap_or_default();
            Ok(RenderPlan::Stacked {
                routes: navigation.routes.iter().map(|r| r.key.clone()).collect(),
                focused,
            })
        }
    }
}

/// A split navigator paired with its layout bridge.
#[derive(Debug)]
pub struct SplitNavigator {
    navigator: Navigator<SplitRouter>,
    bridge: LayoutBridge,
}

impl SplitNavigator {
    pub fn new(navigator: Navigator<SplitRouter>, bridge: LayoutBridge) -> Self {
        let mut this = Self { navigator, bridge };
        this.bridge.record_focus(this.navigator.state());
        this
    }

    pub fn state(&self) -> &SplitState {
        self.navigator.state()
    }

    pub fn navigator(&self) -> &Navigator<SplitRouter> {
        &self.navigator
    }

    pub fn bridge(&self) -> &LayoutBridge {
        &self.bridge
    }

    /// Feeds a viewport observation through the bridge, dispatching the
    /// resulting `SET_SPLIT` if any.
    ///
    /// Returns whether the layout flag changed.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors raised while converting.
    pub fn resize(&mut self, viewport: Viewport) -> Result<bool, NavigationError> {
        match self.bridge.observe(viewport) {
            Some(action) => {
                self.dispatch(action)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Dispatches `action` and records the resulting focus.
    ///
    /// # Errors
    ///
    /// Propagates configuration errors from the router.
    pub fn dispatch(&mut self, action: Action) -> Result<bool, NavigationError> {
        let handled = self.navigator.dispatch(action)?;
        self.bridge.record_focus(self.navigator.state());
        Ok(handled)
    }

    /// Moves focus to the route with `key`.
    pub fn focus(&mut self, key: &str) {
        self.navigator.focus(key);
        self.bridge.record_focus(self.navigator.state());
    }

    /// # Errors
    ///
    /// See [`LayoutBridge::render_plan`].
    pub fn render_plan(&self) -> Result<RenderPlan, NavigationError> {
        self.bridge.render_plan(self.navigator.state())
    }
}

/// Forwards viewport observations to `navigator` until the channel closes.
///
/// Observations are handled one at a time in arrival order.  A configuration
/// error is logged and the pump keeps running; the navigator state is left
/// as it was before the failing observation.
pub async fn pump_viewport_changes(
    mut rx: mpsc::UnboundedReceiver<Viewport>,
    navigator: Arc<Mutex<SplitNavigator>>,
) {
    while let Some(viewport) = rx.recv().await {
        let mut guard = navigator.lock().await;
        match guard.resize(viewport) {
            Ok(true) => info!(
                width = viewport.width,
                height = viewport.height,
                split = guard.state().is_split(),
                "layout updated"
            ),
            Ok(false) => {}
            Err(e) => warn!("viewport change rejected: {e}"),
        }
    }
    debug!("viewport channel closed; pump stopped");
}
