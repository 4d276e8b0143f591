//! Typed screen and overlay declarations.
//!
//! A navigator is configured with an ordered list of [`Declaration`]s.
//! Groups are transparent: their children are spliced in place, which makes
//! it easy to switch a whole set of screens on or off together.  The list is
//! flattened once, at configuration time, and the wrong kind of declaration
//! for a navigator is rejected immediately.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::NavigationError;
use super::model::{Params, RouteConfig};

/// One entry in a navigator's declaration list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    /// A regular screen of a split navigator.
    Screen {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_params: Option<Params>,
    },
    /// An overlay of a modal navigator.
    Overlay {
        name: String,
        /// Params merged under the caller's params every time it is shown.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default_props: Option<Params>,
    },
    /// Transparent grouping of other declarations.
    Group {
        #[serde(default)]
        children: Vec<Declaration>,
    },
}

impl Declaration {
    pub fn screen(name: impl Into<String>) -> Self {
        Declaration::Screen {
            name: name.into(),
            initial_params: None,
        }
    }

    pub fn screen_with_params(name: impl Into<String>, params: Params) -> Self {
        Declaration::Screen {
            name: name.into(),
            initial_params: Some(params),
        }
    }

    pub fn overlay(name: impl Into<String>) -> Self {
        Declaration::Overlay {
            name: name.into(),
            default_props: None,
        }
    }

    pub fn overlay_with_defaults(name: impl Into<String>, default_props: Params) -> Self {
        Declaration::Overlay {
            name: name.into(),
            default_props: Some(default_props),
        }
    }

    pub fn group(children: Vec<Declaration>) -> Self {
        Declaration::Group { children }
    }

    /// Human-readable kind, used in configuration errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Declaration::Screen { .. } => "Screen",
            Declaration::Overlay { .. } => "Overlay",
            Declaration::Group { .. } => "Group",
        }
    }
}

/// A flattened overlay declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    pub name: String,
    pub default_props: Option<Params>,
}

/// Flattens the declarations of a modal navigator.
///
/// # Errors
///
/// Returns [`NavigationError::InvalidDeclaration`] for any `Screen`, and
/// [`NavigationError::DuplicateRouteName`] when a name repeats.
pub fn overlay_configs(declarations: &[Declaration]) -> Result<Vec<OverlayConfig>, NavigationError> {
    let mut configs = Vec::new();
    collect_overlays(declarations, &mut configs)?;
    ensure_unique(configs.iter().map(|c| c.name.as_str()))?;
    Ok(configs)
}

fn collect_overlays(
    declarations: &[Declaration],
    acc: &mut Vec<OverlayConfig>,
) -> Result<(), NavigationError> {
    for declaration in declarations {
        match declaration {
            Declaration::Overlay {
                name,
                default_props,
            } => acc.push(OverlayConfig {
                name: name.clone(),
                default_props: default_props.clone(),
            }),
            Declaration::Group { children } => collect_overlays(children, acc)?,
            other => {
                return Err(NavigationError::InvalidDeclaration {
                    navigator: "modal",
                    expected: "Overlay",
                    found: other.kind(),
                })
            }
        }
    }
    Ok(())
}

/// Flattens the declarations of a split navigator into a [`RouteConfig`].
///
/// # Errors
///
/// Returns [`NavigationError::InvalidDeclaration`] for any `Overlay`, and
/// [`NavigationError::DuplicateRouteName`] when a name repeats.
pub fn screen_route_config(declarations: &[Declaration]) -> Result<RouteConfig, NavigationError> {
    let mut config = RouteConfig::default();
    collect_screens(declarations, &mut config)?;
    ensure_unique(config.route_names.iter().map(String::as_str))?;
    Ok(config)
}

fn collect_screens(
    declarations: &[Declaration],
    config: &mut RouteConfig,
) -> Result<(), NavigationError> {
    for declaration in declarations {
        match declaration {
            Declaration::Screen {
                name,
                initial_params,
            } => {
                config.route_names.push(name.clone());
                if let Some(params) = initial_params {
                    config.route_param_list.insert(name.clone(), params.clone());
                }
            }
            Declaration::Group { children } => collect_screens(children, config)?,
            other => {
                return Err(NavigationError::InvalidDeclaration {
                    navigator: "split",
                    expected: "Screen",
                    found: other.kind(),
                })
            }
        }
    }
    Ok(())
}

/// Checks a route-name list for duplicates and emptiness.
pub(crate) fn validate_route_names(route_names: &[String]) -> Result<(), NavigationError> {
    if route_names.is_empty() {
        return Err(NavigationError::EmptyRouteNames);
    }
    ensure_unique(route_names.iter().map(String::as_str))
}

fn ensure_unique<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), NavigationError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(NavigationError::DuplicateRouteName(name.to_string()));
        }
    }
    Ok(())
}
