//! Dispatch protocol shared by all routers.
//!
//! - **`action`** – the action vocabulary and its JSON wire shape.
//! - **`order`** – the per-router counter that derives overlay stacking order.

pub mod action;
pub mod order;

pub use action::Action;
pub use order::OrderCounter;
