//! Storage infrastructure: configuration and navigation snapshot files.
//!
//! - `config`   – the TOML settings file (layout threshold, screen and
//!   overlay declarations, log level).  Missing file ⇒ defaults.
//! - `snapshot` – the last split navigation state as JSON, so a restart
//!   resumes where the user left off.

pub mod config;
pub mod snapshot;
