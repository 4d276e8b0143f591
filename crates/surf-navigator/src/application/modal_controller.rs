//! ModalController: imperative façade over an overlay navigator.
//!
//! Application code wants to say "show the share sheet" from anywhere, not
//! build actions and find the right navigator.  [`ModalController`] wraps a
//! `Navigator<ModalRouter>` with `show` / `hide` / `hide_all` / `go_back`
//! and, after every change, walks the overlay routes and tells the
//! [`OverlayHost`] what to draw.
//!
//! # Presence transitions
//!
//! Overlays usually animate in and out, so the host needs to know when an
//! overlay *becomes* visible or hidden, not just whether it is visible now.
//! The controller remembers which keys it has presented and calls
//! [`OverlayHost::present`] / [`OverlayHost::dismiss`] exactly once per
//! transition.  [`OverlayHost::render`] is called for every registered route
//! on every pass, in array order, so the frontmost overlay is drawn last.
//!
//! # Scoped access
//!
//! Instead of a process-wide "current controller", callers hold a
//! [`ModalContext`]: a cheap, cloneable handle to whichever controller is
//! mounted in one overlay tree.  Calls made while nothing is mounted are
//! ignored.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use surf_core::{Action, ModalRouter, ModalState, NavigationError, Params};
use tracing::debug;

use super::navigator::Navigator;

/// The renderer side of an overlay tree.
#[cfg_attr(test, mockall::automock)]
pub trait OverlayHost: Send {
    /// Draws the overlay with `key`.  Called on every render pass.
    fn render(&mut self, key: &str);

    /// The overlay with `key` just became visible with `params`.
    fn present(&mut self, key: &str, params: &Params);

    /// The overlay with `key` just became hidden.
    fn dismiss(&mut self, key: &str);
}

pub struct ModalController {
    navigator: Navigator<ModalRouter>,
    host: Box<dyn OverlayHost>,
    /// Overlay names that have a scene to draw.
    registered: HashSet<String>,
    /// Route keys currently presented by the host.
    presented: HashSet<String>,
}

impl std::fmt::Debug for ModalController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalController")
            .field("state", self.navigator.state())
            .field("registered", &self.registered)
            .field("presented", &self.presented)
            .finish_non_exhaustive()
    }
}

impl ModalController {
    /// Creates a controller with every declared overlay registered.
    pub fn new(navigator: Navigator<ModalRouter>, host: Box<dyn OverlayHost>) -> Self {
        let registered = navigator.config().route_names.iter().cloned().collect();
        Self {
            navigator,
            host,
            registered,
            presented: HashSet::new(),
        }
    }

    pub fn state(&self) -> &ModalState {
        self.navigator.state()
    }

    pub fn navigator(&self) -> &Navigator<ModalRouter> {
        &self.navigator
    }

    /// Makes `name` drawable.  Routes without a registered scene are skipped
    /// when rendering.
    pub fn register(&mut self, name: impl Into<String>) {
        let name = name.into();
        debug!(overlay = %name, "overlay scene registered");
        self.registered.insert(name);
    }

    pub fn unregister(&mut self, name: &str) {
        self.registered.remove(name);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registered.contains(name)
    }

    /// Raises `name` to the front.  Returns `false` for unknown overlays.
    ///
    /// # Errors
    ///
    /// Propagates router configuration errors.
    pub fn show(&mut self, name: &str, params: Option<Params>) -> Result<bool, NavigationError> {
        self.dispatch(Action::show(name, params))
    }

    /// Hides `name`.  Returns `false` for unknown overlays.
    ///
    /// # Errors
    ///
    /// Propagates router configuration errors.
    pub fn hide(&mut self, name: &str) -> Result<bool, NavigationError> {
        self.dispatch(Action::hide(name))
    }

    /// # Errors
    ///
    /// Propagates router configuration errors.
    pub fn hide_all(&mut self) -> Result<bool, NavigationError> {
        self.dispatch(Action::HideAll)
    }

    /// Hides the topmost overlay.  Returns `false` when none is visible.
    ///
    /// # Errors
    ///
    /// Propagates router configuration errors.
    pub fn go_back(&mut self) -> Result<bool, NavigationError> {
        self.dispatch(Action::GoBack)
    }

    /// Dispatches `action` to the overlay navigator and re-renders.
    ///
    /// # Errors
    ///
    /// Propagates router configuration errors.
    pub fn dispatch(&mut self, action: Action) -> Result<bool, NavigationError> {
        let handled = self.navigator.dispatch(action)?;
        if handled {
            self.render();
        }
        Ok(handled)
    }

    /// Runs one render pass over the current state.
    pub fn render(&mut self) {
        let routes = self.navigator.state().routes.clone();
        for route in &routes {
            if !self.registered.contains(&route.name) {
                continue;
            }
            self.host.render(&route.key);

            let visible = route.is_visible();
            let was_presented = self.presented.contains(&route.key);
            if visible && !was_presented {
                debug!(overlay = %route.name, order = route.order, "presenting overlay");
                let empty = Params::new();
                self.host.present(&route.key, route.params.as_ref().unwrap_or(&empty));
                self.presented.insert(route.key.clone());
            } else if !visible && was_presented {
                debug!(overlay = %route.name, "dismissing overlay");
                self.host.dismiss(&route.key);
                self.presented.remove(&route.key);
            }
        }
    }
}

/// Shared handle to the controller mounted in one overlay tree.
#[derive(Debug, Clone, Default)]
pub struct ModalContext {
    inner: Arc<Mutex<Option<ModalController>>>,
}

impl ModalContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<ModalController>> {
        // A panic inside a render pass leaves a usable controller behind.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mounts `controller`, rendering it once.  Replaces (and returns) any
    /// previously mounted controller.
    pub fn mount(&self, mut controller: ModalController) -> Option<ModalController> {
        controller.render();
        self.lock().replace(controller)
    }

    /// Unmounts and returns the current controller.
    pub fn unmount(&self) -> Option<ModalController> {
        self.lock().take()
    }

    pub fn is_mounted(&self) -> bool {
        self.lock().is_some()
    }

    /// Runs `f` against the mounted controller, if any.
    pub fn with_controller<T>(&self, f: impl FnOnce(&mut ModalController) -> T) -> Option<T> {
        self.lock().as_mut().map(f)
    }

    /// Shows `name` on the mounted controller.  Returns `Ok(false)` when
    /// nothing is mounted or the overlay is unknown.
    ///
    /// # Errors
    ///
    /// Propagates router configuration errors.
    pub fn show(&self, name: &str, params: Option<Params>) -> Result<bool, NavigationError> {
        self.with_controller(|c| c.show(name, params))
            .unwrap_or(Ok(false))
    }

    /// # Errors
    ///
    /// Propagates router configuration errors.
    pub fn hide(&self, name: &str) -> Result<bool, NavigationError> {
        self.with_controller(|c| c.hide(name)).unwrap_or(Ok(false))
    }

    /// # Errors
    ///
    /// Propagates router configuration errors.
    pub fn hide_all(&self) -> Result<bool, NavigationError> {
        self.with_controller(ModalController::hide_all)
            .unwrap_or(Ok(false))
    }

    /// # Errors
    ///
    /// Propagates router configuration errors.
    pub fn go_back(&self) -> Result<bool, NavigationError> {
        self.with_controller(ModalController::go_back)
            .unwrap_or(Ok(false))
    }
}
