//! Actions understood by the routers.
//!
//! Every intent reaches a router through a single `dispatch(action)` entry
//! point.  Actions are plain data so they can be logged, queued and replayed;
//! on the wire they are internally tagged JSON objects:
//!
//! ```json
//! { "type": "SHOW", "name": "share-sheet", "params": { "id": 7 } }
//! { "type": "SET_SPLIT", "isSplit": true, "initialRouteName": "inbox" }
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::model::Params;

fn default_pop_count() -> usize {
    1
}

/// A navigation intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    /// Focus a route by key (when given) or name, merging `params`.
    Navigate {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<Params>,
    },
    /// Focus a sibling route by name.
    JumpTo {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<Params>,
    },
    /// Pop the stacked layout, or hide the topmost overlay.
    GoBack,
    /// Push a new route instance onto the stack.
    Push {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<Params>,
    },
    /// Pop `count` routes off the stack.
    Pop {
        #[serde(default = "default_pop_count")]
        count: usize,
    },
    /// Return to the root of the stack.
    PopToTop,
    /// Convert a split navigator between its two representations.
    SetSplit {
        is_split: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_route_name: Option<String>,
    },
    /// Raise an overlay to the front and mark it visible.
    Show {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<Params>,
    },
    /// Lower an overlay and mark it hidden.
    Hide { name: String },
    /// Mark every overlay hidden.
    HideAll,
    /// Merge params into the route with `key`, or the focused route.
    SetParams {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
        params: Params,
    },
}

impl Action {
    pub fn navigate(name: impl Into<String>) -> Self {
        Action::Navigate {
            name: name.into(),
            key: None,
            params: None,
        }
    }

    pub fn navigate_with_params(name: impl Into<String>, params: Params) -> Self {
        Action::Navigate {
            name: name.into(),
            key: None,
            params: Some(params),
        }
    }

    pub fn jump_to(name: impl Into<String>) -> Self {
        Action::JumpTo {
            name: name.into(),
            params: None,
        }
    }

    pub fn push(name: impl Into<String>) -> Self {
        Action::Push {
            name: name.into(),
            params: None,
        }
    }

    pub fn set_split(is_split: bool, initial_route_name: Option<String>) -> Self {
        Action::SetSplit {
            is_split,
            initial_route_name,
        }
    }

    pub fn show(name: impl Into<String>, params: Option<Params>) -> Self {
        Action::Show {
            name: name.into(),
            params,
        }
    }

    pub fn hide(name: impl Into<String>) -> Self {
        Action::Hide { name: name.into() }
    }

    /// The wire tag, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Navigate { .. } => "NAVIGATE",
            Action::JumpTo { .. } => "JUMP_TO",
            Action::GoBack => "GO_BACK",
            Action::Push { .. } => "PUSH",
            Action::Pop { .. } => "POP",
            Action::PopToTop => "POP_TO_TOP",
            Action::SetSplit { .. } => "SET_SPLIT",
            Action::Show { .. } => "SHOW",
            Action::Hide { .. } => "HIDE",
            Action::HideAll => "HIDE_ALL",
            Action::SetParams { .. } => "SET_PARAMS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_split_uses_camel_case_fields() {
        let action = Action::set_split(true, Some("inbox".to_string()));
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(
            value,
            json!({"type": "SET_SPLIT", "isSplit": true, "initialRouteName": "inbox"})
        );
    }

    #[test]
    fn test_show_without_params_omits_field() {
        let value = serde_json::to_value(Action::show("a", None)).unwrap();
        assert_eq!(value, json!({"type": "SHOW", "name": "a"}));
    }

    #[test]
    fn test_pop_count_defaults_to_one() {
        let action: Action = serde_json::from_value(json!({"type": "POP"})).unwrap();
        assert_eq!(action, Action::Pop { count: 1 });
    }

    #[test]
    fn test_unit_actions_parse_from_tag_only() {
        let action: Action = serde_json::from_value(json!({"type": "HIDE_ALL"})).unwrap();
        assert_eq!(action, Action::HideAll);
        assert_eq!(action.kind(), "HIDE_ALL");
    }
}
