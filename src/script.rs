//! JSON gesture scripts replayed against a headless engine.
//!
//! A script is a JSON array of events, for example:
//!
//! ```json
//! [
//!   { "event": "tool", "tool": "rectangle" },
//!   { "event": "down", "x": 10, "y": 10 },
//!   { "event": "move", "x": 60, "y": 40 },
//!   { "event": "up", "x": 60, "y": 40 },
//!   { "event": "undo" }
//! ]
//! ```

use crate::draw::{BackgroundMode, Color, SurfaceError};
use crate::input::{InputState, Key, Modifiers, MouseButton, Tool};
use crate::util::Point;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One scripted host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    Resize {
        width: i32,
        height: i32,
    },
    Tool {
        tool: Tool,
    },
    /// Changes only the given style fields
    Style {
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        opacity: Option<f64>,
    },
    Background {
        mode: BackgroundMode,
    },
    Down {
        x: f64,
        y: f64,
        #[serde(default)]
        button: MouseButton,
    },
    Move {
        x: f64,
        y: f64,
    },
    Up {
        x: f64,
        y: f64,
        #[serde(default)]
        button: MouseButton,
    },
    Leave,
    Key {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Text {
        text: String,
    },
    /// Pastes a file's bytes with the given MIME type; relative paths are
    /// resolved against the script's directory
    Paste {
        mime: String,
        path: PathBuf,
    },
    Blur,
    Undo,
    Redo,
    Clear,
    /// Waits for in-flight history restores
    Settle,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("invalid script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("event {index}: unknown color '{color}'")]
    InvalidColor { index: usize, color: String },

    #[error("event {index}: {source}")]
    Surface {
        index: usize,
        #[source]
        source: SurfaceError,
    },

    #[error("event {index}: failed to read {path}: {source}")]
    Io {
        index: usize,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    pub events: usize,
    pub history_len: usize,
    pub history_index: isize,
    pub restore_failures: usize,
}

pub fn parse_script(source: &str) -> Result<Vec<ScriptEvent>, ScriptError> {
    Ok(serde_json::from_str(source)?)
}

/// Feeds `events` to `state` in order.
///
/// `base_dir` resolves relative paste paths. Restores are settled once all
/// events have run, so the returned summary reflects the final history state.
pub fn replay(
    state: &mut InputState,
    events: &[ScriptEvent],
    base_dir: &Path,
) -> Result<ReplaySummary, ScriptError> {
    let mut summary = ReplaySummary::default();

    for (index, event) in events.iter().enumerate() {
        log::debug!("Script event {}: {:?}", index, event);
        let surface_err = |source| ScriptError::Surface { index, source };

        match event {
            ScriptEvent::Resize { width, height } => {
                state.resize(*width, *height).map_err(surface_err)?;
            }
            ScriptEvent::Tool { tool } => state.set_tool(*tool),
            ScriptEvent::Style {
                color,
                width,
                opacity,
            } => {
                let mut style = state.style();
                if let Some(name) = color {
                    style.color = Color::parse(name).ok_or_else(|| ScriptError::InvalidColor {
                        index,
                        color: name.clone(),
                    })?;
                }
                if let Some(width) = width {
                    style.width = width.max(1.0);
                }
                if let Some(opacity) = opacity {
                    style.opacity = opacity.clamp(0.0, 1.0);
                }
                state.set_style(style);
            }
            ScriptEvent::Background { mode } => state.set_background_mode(*mode),
            ScriptEvent::Down { x, y, button } => {
                state.on_pointer_down(*button, Point::new(*x, *y));
            }
            ScriptEvent::Move { x, y } => {
                state.on_pointer_move(Point::new(*x, *y));
            }
            ScriptEvent::Up { x, y, button } => {
                state.on_pointer_up(*button, Point::new(*x, *y));
            }
            ScriptEvent::Leave => {
                state.on_pointer_leave();
            }
            ScriptEvent::Key { key, modifiers } => {
                state.on_key(*key, *modifiers);
            }
            ScriptEvent::Text { text } => {
                state.insert_text(text);
            }
            ScriptEvent::Paste { mime, path } => {
                let path = base_dir.join(path);
                let bytes = std::fs::read(&path).map_err(|source| ScriptError::Io {
                    index,
                    path: path.clone(),
                    source,
                })?;
                state.on_paste(mime, &bytes);
            }
            ScriptEvent::Blur => state.on_text_blur(),
            ScriptEvent::Undo => {
                state.undo();
            }
            ScriptEvent::Redo => {
                state.redo();
            }
            ScriptEvent::Clear => state.clear(),
            ScriptEvent::Settle => state.settle_restores(),
        }

        state.poll_restores();
        if state.take_restore_failure().is_some() {
            summary.restore_failures += 1;
        }
        summary.events += 1;
    }

    state.settle_restores();
    if state.take_restore_failure().is_some() {
        summary.restore_failures += 1;
    }
    summary.history_len = state.history_len();
    summary.history_index = state.history_index();
    log::info!(
        "Replayed {} event(s): history index {} of {}",
        summary.events,
        summary.history_index,
        summary.history_len
    );
    Ok(summary)
}
