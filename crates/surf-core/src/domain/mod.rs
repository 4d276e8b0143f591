//! Domain entities for surf navigation.
//!
//! This module contains the data shapes every router operates on and has no
//! dependency on rendering or on the host dispatcher.
//!
//! - **`model`** – routes, navigation states and the split/stacked wrapper.
//! - **`declaration`** – the typed list of screens and overlays a navigator
//!   is configured with.
//! - **`keys`** – the injected unique-id generator used for route keys.
//! - **`error`** – fatal configuration errors.

pub mod declaration;
pub mod error;
pub mod keys;
pub mod model;
