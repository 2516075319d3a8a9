//! Drawing tool selection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing tool selection.
///
/// Exactly one tool is active at a time. The active tool decides which
/// pipeline a pointer gesture feeds: the raster surface (freehand tools),
/// the preview surface (shape tools) or the text overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Click-through mode: the canvas ignores pointer input
    Cursor,
    /// Freehand ink (default)
    #[default]
    Pen,
    /// Translucent freehand ink
    Highlighter,
    /// Freehand erasing of committed ink
    Eraser,
    /// Rectangle outline from corner to corner
    Rectangle,
    /// Circle outline from center outward
    Circle,
    /// Straight line
    Line,
    /// Line with a directional head at the release point
    Arrow,
    /// Click to place a text entry box
    Text,
}

impl Tool {
    /// All tools in toolbar order.
    pub const ALL: [Tool; 9] = [
        Tool::Cursor,
        Tool::Pen,
        Tool::Highlighter,
        Tool::Eraser,
        Tool::Rectangle,
        Tool::Circle,
        Tool::Line,
        Tool::Arrow,
        Tool::Text,
    ];

    /// Tools that paint directly into the raster while the pointer moves.
    pub fn is_freehand(self) -> bool {
        matches!(self, Tool::Pen | Tool::Highlighter | Tool::Eraser)
    }

    /// Tools that are dragged out on the preview surface.
    pub fn is_shape(self) -> bool {
        matches!(
            self,
            Tool::Rectangle | Tool::Circle | Tool::Line | Tool::Arrow
        )
    }

    /// False only for the click-through cursor.
    pub fn intercepts_pointer(self) -> bool {
        self != Tool::Cursor
    }

    /// Lowercase name used by config files and scripts.
    pub fn name(self) -> &'static str {
        match self {
            Tool::Cursor => "cursor",
            Tool::Pen => "pen",
            Tool::Highlighter => "highlighter",
            Tool::Eraser => "eraser",
            Tool::Rectangle => "rectangle",
            Tool::Circle => "circle",
            Tool::Line => "line",
            Tool::Arrow => "arrow",
            Tool::Text => "text",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name() == lowered)
            .ok_or_else(|| format!("unknown tool '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn tool_classes_are_disjoint() {
        for tool in Tool::ALL {
            let classes = [tool.is_freehand(), tool.is_shape(), tool == Tool::Text];
            let count = classes.iter().filter(|c| **c).count();
            if tool == Tool::Cursor {
                assert_eq!(count, 0);
                assert!(!tool.intercepts_pointer());
            } else {
                assert_eq!(count, 1, "{tool} belongs to exactly one class");
                assert!(tool.intercepts_pointer());
            }
        }
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(Tool::from_str("Highlighter"), Ok(Tool::Highlighter));
        assert_eq!(Tool::from_str(" arrow "), Ok(Tool::Arrow));
        assert!(Tool::from_str("lasso").is_err());
        for tool in Tool::ALL {
            assert_eq!(Tool::from_str(&tool.to_string()), Ok(tool));
        }
    }

    #[test]
    fn deserializes_lowercase_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            tool: Tool,
        }
        let parsed: Wrapper = toml::from_str("tool = \"eraser\"").unwrap();
        assert_eq!(parsed.tool, Tool::Eraser);
    }
}
