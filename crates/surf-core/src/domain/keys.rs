//! Unique key generation for routes and states.
//!
//! Routers never invent ids themselves: a [`KeyGenerator`] is injected at
//! construction so production code gets random UUIDs while tests get
//! predictable, sequential keys.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use uuid::Uuid;

/// Source of fresh unique ids.
pub trait KeyGenerator: Send + Sync {
    /// Returns an id that has not been returned before by this generator.
    fn next_id(&self) -> String;
}

/// Generator shared between a router and the primitives it composes.
pub type SharedKeyGenerator = Arc<dyn KeyGenerator>;

impl fmt::Debug for dyn KeyGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyGenerator")
    }
}

/// Builds a route key of the form `<name>-<id>`.
pub fn route_key(keys: &dyn KeyGenerator, name: &str) -> String {
    format!("{name}-{}", keys.next_id())
}

/// Builds a state key of the form `<router type>-<id>`.
pub fn state_key(keys: &dyn KeyGenerator, router_type: &str) -> String {
    format!("{router_type}-{}", keys.next_id())
}

/// Random UUID v4 ids (hyphenless).
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidKeyGenerator;

impl UuidKeyGenerator {
    pub fn shared() -> SharedKeyGenerator {
        Arc::new(Self)
    }
}

impl KeyGenerator for UuidKeyGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic ids `0, 1, 2, ...`.
#[derive(Debug, Default)]
pub struct SequentialKeyGenerator {
    inner: AtomicU64,
}

impl SequentialKeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedKeyGenerator {
        Arc::new(Self::new())
    }
}

impl KeyGenerator for SequentialKeyGenerator {
    fn next_id(&self) -> String {
        self.inner.fetch_add(1, Ordering::Relaxed).to_string()
    }
}
