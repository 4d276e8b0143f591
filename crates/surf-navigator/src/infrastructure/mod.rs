//! Infrastructure layer for the navigator host.
//!
//! Contains the adapters that touch the outside world: the configuration and
//! snapshot files on disk, the viewport source feeding resize events, and the
//! line-oriented console used by the binary.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `surf_core`, but MUST NOT be imported by the `application` layer.

pub mod console;
pub mod storage;
pub mod viewport;
