//! Fatal configuration errors raised by routers.
//!
//! Unknown routes or keys are never errors: reducers report them by returning
//! `None` ("action not handled").  The variants here describe programming-time
//! misconfiguration that cannot be recovered from at runtime.

use thiserror::Error;

/// Errors that can occur when configuring or driving a navigator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Split navigation needs a screen named `main` to anchor both layouts.
    #[error("a split navigator requires a screen named \"main\"")]
    MissingMainRoute,

    /// A declaration of the wrong kind was found in a navigator's list.
    #[error("a {navigator} navigator can only contain '{expected}' declarations or groups (found '{found}')")]
    InvalidDeclaration {
        navigator: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// Two declarations share a name within the same navigator.
    #[error("duplicate route name: {0}")]
    DuplicateRouteName(String),

    /// The navigator was configured without any route names.
    #[error("navigator has no route names")]
    EmptyRouteNames,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_error_display() {
        let error = NavigationError::MissingMainRoute;
        assert!(error.to_string().contains("\"main\""));

        let error = NavigationError::InvalidDeclaration {
            navigator: "modal",
            expected: "Overlay",
            found: "Screen",
        };
        assert!(error.to_string().contains("found 'Screen'"));
        assert!(error.to_string().contains("modal navigator"));

        let error = NavigationError::DuplicateRouteName("inbox".to_string());
        assert!(error.to_string().contains("inbox"));
    }
}
