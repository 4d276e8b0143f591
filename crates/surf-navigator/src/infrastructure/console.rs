//! Line-oriented console used by the `surf-navigator` binary.
//!
//! Each stdin line is one [`Command`]:
//!
//! ```text
//! resize <width> [height]     report a viewport size
//! navigate <name> [{json}]    NAVIGATE in the split navigator
//! jump <name>                 JUMP_TO in the split navigator
//! back                        GO_BACK in the split navigator
//! show <name> [{json}]        raise an overlay
//! hide <name>                 hide an overlay
//! hide-all                    hide every overlay
//! close                       hide the topmost overlay
//! state                       print both navigation states as JSON
//! plan                        print the split render plan
//! quit                        save a snapshot and exit
//! ```
//!
//! The overlay side has no real window here, so [`LoggingOverlayHost`]
//! reports presence changes through `tracing`.

use surf_core::Params;
use thiserror::Error;
use tracing::{debug, info};

use crate::application::layout_bridge::Viewport;
use crate::application::modal_controller::OverlayHost;

/// Height used when `resize` is given only a width.
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 800;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("`{command}` needs a {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("invalid number {value:?}: {source}")]
    InvalidNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("params must be a JSON object: {0}")]
    InvalidParams(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Resize(Viewport),
    Navigate { name: String, params: Option<Params> },
    Jump(String),
    Back,
    Show { name: String, params: Option<Params> },
    Hide(String),
    HideAll,
    Close,
    State,
    Plan,
    Quit,
}

impl Command {
    /// Parses one console line.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] describing the first problem found.
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "" => Err(ParseError::Empty),
            "resize" => parse_resize(rest),
            "navigate" => {
                let (name, params) = name_and_params("navigate", rest)?;
                Ok(Command::Navigate { name, params })
            }
            "jump" => Ok(Command::Jump(name_only("jump", rest)?)),
            "back" => Ok(Command::Back),
            "show" => {
                let (name, params) = name_and_params("show", rest)?;
                Ok(Command::Show { name, params })
            }
            "hide" => Ok(Command::Hide(name_only("hide", rest)?)),
            "hide-all" => Ok(Command::HideAll),
            "close" => Ok(Command::Close),
            "state" => Ok(Command::State),
            "plan" => Ok(Command::Plan),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_number(value: &str) -> Result<u32, ParseError> {
    value.parse().map_err(|source| ParseError::InvalidNumber {
        value: value.to_string(),
        source,
    })
}

fn parse_resize(rest: &str) -> Result<Command, ParseError> {
    let mut parts = rest.split_whitespace();
    let width = parts.next().ok_or(ParseError::MissingArgument {
        command: "resize",
        argument: "width",
    })?;
    let width = parse_number(width)?;
    let height = match parts.next() {
        Some(height) => parse_number(height)?,
        None => DEFAULT_VIEWPORT_HEIGHT,
    };
    Ok(Command::Resize(Viewport::new(width, height)))
}

fn name_only(command: &'static str, rest: &str) -> Result<String, ParseError> {
    rest.split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or(ParseError::MissingArgument {
            command,
            argument: "route name",
        })
}

fn name_and_params(
    command: &'static str,
    rest: &str,
) -> Result<(String, Option<Params>), ParseError> {
    let name = name_only(command, rest)?;
    let json = rest[name.len()..].trim();
    if json.is_empty() {
        return Ok((name, None));
    }
    match serde_json::from_str::<serde_json::Value>(json) {
        Ok(serde_json::Value::Object(params)) => Ok((name, Some(params))),
        Ok(other) => Err(ParseError::InvalidParams(format!("got {other}"))),
        Err(e) => Err(ParseError::InvalidParams(e.to_string())),
    }
}

/// An [`OverlayHost`] that only logs.
#[derive(Debug, Default)]
pub struct LoggingOverlayHost {
    presented: usize,
}

impl LoggingOverlayHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverlayHost for LoggingOverlayHost {
    fn render(&mut self, key: &str) {
        debug!(key, "overlay rendered");
    }

    fn present(&mut self, key: &str, params: &Params) {
        self.presented += 1;
        info!(
            key,
            params = %serde_json::Value::Object(params.clone()),
            on_screen = self.presented,
            "overlay shown"
        );
    }

    fn dismiss(&mut self, key: &str) {
        self.presented = self.presented.saturating_sub(1);
        info!(key, on_screen = self.presented, "overlay hidden");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_resize_with_and_without_height() {
        assert_eq!(
            Command::parse("resize 1024 768").unwrap(),
            Command::Resize(Viewport::new(1024, 768))
        );
        assert_eq!(
            Command::parse("  resize 480 ").unwrap(),
            Command::Resize(Viewport::new(480, DEFAULT_VIEWPORT_HEIGHT))
        );
    }

    #[test]
    fn test_parse_navigate_with_json_params() {
        // Arrange
        let line = r#"navigate second {"id": 3, "title": "x y"}"#;

        // Act
        let command = Command::parse(line).unwrap();

        // Assert
        let Command::Navigate { name, params } = command else {
            panic!("expected a navigate command");
        };
        assert_eq!(name, "second");
        let params = params.unwrap();
        assert_eq!(params.get("id"), Some(&json!(3)));
        assert_eq!(params.get("title"), Some(&json!("x y")));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Command::parse("back").unwrap(), Command::Back);
        assert_eq!(Command::parse("hide-all").unwrap(), Command::HideAll);
        assert_eq!(Command::parse("close").unwrap(), Command::Close);
        assert_eq!(Command::parse("exit").unwrap(), Command::Quit);
        assert_eq!(Command::parse("jump first").unwrap(), Command::Jump("first".to_string()));
        assert_eq!(
            Command::parse("show menu").unwrap(),
            Command::Show {
                name: "menu".to_string(),
                params: None
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(Command::parse("   "), Err(ParseError::Empty)));
        assert!(matches!(Command::parse("fly"), Err(ParseError::UnknownCommand(c)) if c == "fly"));
        assert!(matches!(
            Command::parse("hide"),
            Err(ParseError::MissingArgument { command: "hide", .. })
        ));
        assert!(matches!(
            Command::parse("resize wide"),
            Err(ParseError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Command::parse("show menu [1, 2]"),
            Err(ParseError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_logging_overlay_host_counts_on_screen_overlays() {
        let mut host = LoggingOverlayHost::new();
        host.present("a-0", &Params::new());
        host.present("b-1", &Params::new());
        host.dismiss("a-0");
        host.render("b-1");
        assert_eq!(host.presented, 1);
    }
}
