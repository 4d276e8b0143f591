//! Application layer: the pieces that drive the pure routers.
//!
//! # What is the "application" layer? (for beginners)
//!
//! The routers in `surf-core` only compute the next state.  Something still
//! has to *hold* the current state, decide which router an action goes to,
//! react to the window being resized and tell the renderer what to draw.
//! That orchestration lives here.  Nothing in this layer touches a file, a
//! terminal or a real window: those are infrastructure concerns injected
//! through traits.
//!
//! # Sub-modules
//!
//! - **`navigator`**        – Owns one router plus its current state and
//!   applies queued actions one at a time, in order.
//!
//! - **`layout_bridge`**    – Turns viewport widths into `SET_SPLIT`
//!   actions, remembers which secondary scenes were ever focused (lazy
//!   mounting) and builds the split/stacked render plan.
//!
//! - **`modal_controller`** – Imperative `show`/`hide` façade over an overlay
//!   navigator, plus the scoped [`ModalContext`] handle callers use instead
//!   of a global.
//!
//! [`ModalContext`]: modal_controller::ModalContext

pub mod layout_bridge;
pub mod modal_controller;
pub mod navigator;
