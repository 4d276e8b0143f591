//! # surf-core
//!
//! Navigation state model and pure reducers for an application whose layout
//! alternates between a single-focus "stacked" presentation and a dual-pane
//! "split" presentation, plus an independent set of overlay routes ordered by
//! recency.
//!
//! This crate has zero dependencies on rendering, viewport measurement or any
//! async runtime.  Every reducer is a function of `(state, action)` that
//! returns a new state value; nothing here performs I/O.
//!
//! # Architecture overview
//!
//! - **`domain`** – The shared data shapes: [`Route`], [`NavigationState`],
//!   [`SplitState`], [`ModalRoute`], the typed screen [`Declaration`] list and
//!   the injected [`KeyGenerator`].
//!
//! - **`protocol`** – The action vocabulary routers understand ([`Action`])
//!   and the per-router overlay [`OrderCounter`].
//!
//! - **`routers`** – The [`Router`] contract and its four implementations:
//!   the generic [`StackRouter`] and [`TabRouter`] primitives, the
//!   [`SplitRouter`] that converts between them as the layout changes, and the
//!   [`ModalRouter`] that orders overlays.

pub mod domain;
pub mod protocol;
pub mod routers;

pub use domain::declaration::{Declaration, OverlayConfig};
pub use domain::error::NavigationError;
pub use domain::keys::{KeyGenerator, SequentialKeyGenerator, SharedKeyGenerator, UuidKeyGenerator};
pub use domain::model::{
    merge_params, ModalRoute, NavigationState, Params, Route, RouteConfig, RouteLike, SplitMode,
    SplitState, MAIN_ROUTE_NAME,
};
pub use protocol::action::Action;
pub use protocol::order::OrderCounter;
pub use routers::modal::{ModalRouter, ModalRouterOptions, ModalState};
pub use routers::split::{SplitRouter, SplitRouterOptions};
pub use routers::stack::{StackRouter, StackRouterOptions};
pub use routers::tab::{BackBehavior, TabRouter, TabRouterOptions};
pub use routers::Router;
