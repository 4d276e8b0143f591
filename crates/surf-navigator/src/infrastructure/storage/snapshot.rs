//! JSON snapshot of the split navigation state.
//!
//! The snapshot is written when the host shuts down and read back on the next
//! start.  A loaded state is always marked stale: screens may have been
//! added or removed since it was written, so it must go through
//! `Navigator::restore` (the router's rehydration) before use.
//!
//! Overlay state is deliberately not persisted; overlays start hidden.

use std::path::{Path, PathBuf};

use surf_core::SplitState;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error accessing snapshot at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes `state` to `path` as pretty JSON, creating parent directories.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] on file-system failures.
pub fn save_snapshot(state: &SplitState, path: &Path) -> Result<(), SnapshotError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| SnapshotError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let content = serde_json::to_string_pretty(state)?;
    std::fs::write(path, content).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "navigation snapshot saved");
    Ok(())
}

/// Reads the snapshot at `path`.  Returns `Ok(None)` when there is none.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] for read failures other than "not found" and
/// [`SnapshotError::Json`] when the content is not a split state.
pub fn load_snapshot(path: &Path) -> Result<Option<SplitState>, SnapshotError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SnapshotError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let mut state: SplitState = serde_json::from_str(&content)?;
    state.mark_stale();
    Ok(Some(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use surf_core::{
        Action, RouteConfig, Router, SequentialKeyGenerator, SplitRouter, SplitRouterOptions,
    };
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("surf_snapshot_test_{}", Uuid::new_v4()))
            .join("snapshot.json")
    }

    fn config() -> RouteConfig {
        RouteConfig::new(["main", "first", "second"])
    }

    #[test]
    fn test_missing_snapshot_is_none() {
        assert!(load_snapshot(&temp_path()).unwrap().is_none());
    }

    #[test]
    fn test_saved_snapshot_loads_stale_and_rehydrates() {
        // Arrange
        let path = temp_path();
        let router = SplitRouter::new(SplitRouterOptions::default(), SequentialKeyGenerator::shared());
        let initial = router.get_initial_state(&config()).unwrap();
        let state = router
            .get_state_for_action(&initial, &Action::navigate("second"))
            .unwrap()
            .unwrap();

        // Act
        save_snapshot(&state, &path).unwrap();
        let loaded = load_snapshot(&path).unwrap().unwrap();
        let rehydrated = router.get_rehydrated_state(&loaded, &config()).unwrap();

        // Assert
        assert!(loaded.navigation.stale);
        assert!(!rehydrated.navigation.stale);
        assert_eq!(
            rehydrated.focused_route().map(|r| r.name.as_str()),
            Some("second")
        );
        assert_eq!(rehydrated.navigation.routes[1].key, state.navigation.routes[1].key);

        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_malformed_snapshot_is_an_error() {
        let path = temp_path();
        let dir = path.parent().map(Path::to_path_buf).unwrap();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "{\"routes\": 3}").unwrap();

        let result = load_snapshot(&path);

        assert!(matches!(result, Err(SnapshotError::Json(_))));
        std::fs::remove_dir_all(&dir).ok();
    }
}
