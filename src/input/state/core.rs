//! Drawing state machine and input state management.

use crate::config::{BackgroundConfig, Config, ToolSwitchPolicy};
use crate::draw::{
    BackgroundImage, BackgroundLayers, BackgroundMode, DirtyTracker, FontDescriptor,
    PreviewSurface, RasterSurface, ShapeOutline, Style, SurfaceError,
    render::{TEXT_BOX_MIN_HEIGHT, TEXT_BOX_MIN_WIDTH},
};
use crate::history::{HistoryManager, RestoreFailed, RestoreSequencer};
use crate::input::{text::TextSession, tool::Tool};
use crate::util::{self, Point, Rect};
use std::time::Duration;

/// Current drawing mode state machine.
///
/// Tracks whether the user is idle, dragging out a gesture, or typing text.
/// State transitions occur based on pointer and keyboard events.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingState {
    /// Not actively drawing - waiting for user input
    Idle,
    /// Pointer held down with a freehand or shape tool
    Drawing {
        /// Tool captured when the gesture started
        tool: Tool,
        /// Style captured when the gesture started
        style: Style,
        /// Where the pointer went down
        start: Point,
        /// Latest pointer position
        current: Point,
    },
    /// A text box is open and receiving keystrokes
    Typing(TextSession),
}

impl DrawingState {
    /// Outline the live shape gesture currently describes, if any.
    pub fn shape_outline(&self) -> Option<(ShapeOutline, Style)> {
        match self {
            DrawingState::Drawing {
                tool,
                style,
                start,
                current,
            } => ShapeOutline::from_drag(*tool, *start, *current).map(|outline| (outline, *style)),
            _ => None,
        }
    }
}

/// Raster and preview surfaces, created together on mount.
#[derive(Debug)]
pub(crate) struct Surfaces {
    pub(crate) raster: RasterSurface,
    pub(crate) preview: PreviewSurface,
}

impl Surfaces {
    fn new(width: i32, height: i32) -> Result<Self, SurfaceError> {
        Ok(Self {
            raster: RasterSurface::new(width, height)?,
            preview: PreviewSurface::new(width, height)?,
        })
    }
}

/// Main input state containing the whole drawing session.
///
/// Owns the surfaces, the history and the background layers, and exposes the
/// narrow command interface hosts drive: pointer and key events, tool and
/// style setters, undo/redo/clear and frame export.
#[derive(Debug)]
pub struct InputState {
    /// Active tool (changed through [`set_tool`](Self::set_tool))
    pub(crate) tool: Tool,
    /// Brush style applied to the next gesture
    pub(crate) style: Style,
    /// Font descriptor for text commits
    pub(crate) font: FontDescriptor,
    /// Current drawing mode state machine
    pub(crate) state: DrawingState,
    /// Surfaces; `None` until the host mounts the canvas
    pub(crate) surfaces: Option<Surfaces>,
    pub(crate) history: HistoryManager,
    pub(crate) restores: RestoreSequencer,
    /// Most recent restore failure, until the host takes it
    pub(crate) restore_failure: Option<RestoreFailed>,
    /// Background fill and image underneath the raster
    pub(crate) background: BackgroundLayers,
    pub(crate) background_config: BackgroundConfig,
    /// What `set_tool` does to a gesture in progress
    pub(crate) tool_switch: ToolSwitchPolicy,
    pub(crate) clear_drops_background_image: bool,
    pub(crate) include_background_on_export: bool,
    pub(crate) restore_timeout: Duration,
    /// On-screen position of the canvas' top-left corner
    pub(crate) client_origin: Point,
    /// Whether the display needs to be redrawn
    pub needs_redraw: bool,
    /// Tracks dirty regions between renders
    pub(crate) dirty_tracker: DirtyTracker,
    /// Cached bounds for the current shape preview (if any)
    pub(crate) last_preview_bounds: Option<Rect>,
    /// Cached bounds for live text preview/caret (if any)
    pub(crate) last_text_preview_bounds: Option<Rect>,
}

impl InputState {
    /// Creates an unmounted engine from configuration.
    ///
    /// Surfaces are created by the first [`mount`](Self::mount) or
    /// [`resize`](Self::resize); until then drawing operations are no-ops.
    pub fn from_config(config: &Config) -> Self {
        Self {
            tool: config.drawing.default_tool,
            style: config.initial_style(),
            font: config.font(),
            state: DrawingState::Idle,
            surfaces: None,
            history: HistoryManager::new(),
            restores: RestoreSequencer::new(),
            restore_failure: None,
            background: BackgroundLayers::new(config.background.default_mode),
            background_config: config.background.clone(),
            tool_switch: config.behavior.tool_switch,
            clear_drops_background_image: config.behavior.clear_drops_background_image,
            include_background_on_export: config.export.include_background,
            restore_timeout: config.restore_timeout(),
            client_origin: Point::default(),
            needs_redraw: true,
            dirty_tracker: DirtyTracker::new(),
            last_preview_bounds: None,
            last_text_preview_bounds: None,
        }
    }

    /// Creates the surfaces at the container's size.
    ///
    /// Mounting an already mounted engine behaves like [`resize`](Self::resize).
    pub fn mount(&mut self, width: i32, height: i32) -> Result<(), SurfaceError> {
        self.resize(width, height)
    }

    /// Resizes the surfaces in place, keeping committed content anchored at
    /// the origin.
    ///
    /// In-flight restores are settled first so the captured content is the
    /// current logical state. A live shape preview is re-rendered from the
    /// gesture, and an open freehand stroke continues in the new buffer.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), SurfaceError> {
        if width <= 0 || height <= 0 {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        self.settle_restores();

        let redraw_preview = match self.surfaces.as_mut() {
            None => {
                self.surfaces = Some(Surfaces::new(width, height)?);
                log::info!("Drawing surface mounted at {}x{}", width, height);
                false
            }
            Some(surfaces) => {
                surfaces.raster.resize(width, height)?;
                let had_preview = !surfaces.preview.is_blank();
                surfaces.preview = PreviewSurface::new(width, height)?;
                had_preview
            }
        };

        if redraw_preview
            && let Some((outline, style)) = self.state.shape_outline()
            && let Some(surfaces) = self.surfaces.as_mut()
        {
            surfaces.preview.redraw(&outline, &style)?;
        }

        self.dirty_tracker.mark_full();
        self.needs_redraw = true;
        Ok(())
    }

    pub fn is_mounted(&self) -> bool {
        self.surfaces.is_some()
    }

    /// Surface size, or `None` before mount.
    pub fn dimensions(&self) -> Option<(i32, i32)> {
        self.surfaces
            .as_ref()
            .map(|s| (s.raster.width(), s.raster.height()))
    }

    /// Sets the on-screen position of the canvas so pointer events can be
    /// given in client coordinates.
    pub fn set_client_origin(&mut self, origin: Point) {
        self.client_origin = origin;
    }

    pub(crate) fn to_canvas(&self, client: Point) -> Point {
        client.relative_to(self.client_origin)
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn font(&self) -> &FontDescriptor {
        &self.font
    }

    pub fn drawing_state(&self) -> &DrawingState {
        &self.state
    }

    /// Switches the active tool.
    ///
    /// A gesture or text session in progress is committed, kept or discarded
    /// according to the configured [`ToolSwitchPolicy`].
    pub fn set_tool(&mut self, tool: Tool) {
        if tool == self.tool {
            return;
        }
        if !matches!(self.state, DrawingState::Idle) {
            match self.tool_switch {
                ToolSwitchPolicy::Commit => self.end_active_gesture(),
                ToolSwitchPolicy::Continue => {
                    log::debug!("Tool switch keeps the gesture in progress");
                }
                ToolSwitchPolicy::Abort => self.abort_active_gesture(),
            }
        }
        log::info!("Tool changed: {} -> {}", self.tool, tool);
        self.tool = tool;
        self.needs_redraw = true;
    }

    /// Replaces the brush style for subsequent gestures.
    ///
    /// Gestures and text sessions already in progress keep the style they
    /// captured when they started.
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
        self.needs_redraw = true;
    }

    pub fn set_tool_switch_policy(&mut self, policy: ToolSwitchPolicy) {
        self.tool_switch = policy;
    }

    pub fn background(&self) -> &BackgroundLayers {
        &self.background
    }

    pub fn set_background_mode(&mut self, mode: BackgroundMode) {
        if self.background.mode == mode {
            return;
        }
        log::info!(
            "Background mode: {} -> {}",
            self.background.mode.name(),
            mode.name()
        );
        self.background.mode = mode;
        self.dirty_tracker.mark_full();
        self.needs_redraw = true;
    }

    /// Sets or removes the background image layer.
    ///
    /// The image is independent of the raster: it is never captured in
    /// snapshots and undo/redo leave it alone. Undecodable bytes keep the
    /// previous image and report the error.
    pub fn set_background_image(&mut self, bytes: Option<&[u8]>) -> Result<(), SurfaceError> {
        match bytes {
            None => {
                if self.background.image.take().is_some() {
                    log::info!("Background image removed");
                }
            }
            Some(bytes) => match BackgroundImage::decode(bytes) {
                Ok(image) => {
                    log::info!(
                        "Background image set ({}x{})",
                        image.width(),
                        image.height()
                    );
                    self.background.image = Some(image);
                }
                Err(err) => {
                    log::warn!("Rejected background image: {}", err);
                    return Err(err);
                }
            },
        }
        self.dirty_tracker.mark_full();
        self.needs_redraw = true;
        Ok(())
    }

    /// Drains pending dirty rectangles for the current surface size.
    pub fn take_dirty_regions(&mut self) -> Vec<Rect> {
        let (width, height) = self.dimensions().unwrap_or((0, 0));
        self.dirty_tracker.take_regions(width, height)
    }

    /// Updates tracked shape preview bounds for dirty-region purposes.
    pub(crate) fn update_preview_dirty(&mut self) {
        let new_bounds = self
            .state
            .shape_outline()
            .and_then(|(outline, style)| outline.bounding_box(style.width));
        let previous = self.last_preview_bounds;

        if new_bounds != previous
            && let Some(prev) = previous
        {
            self.dirty_tracker.mark_rect(prev);
        }
        self.dirty_tracker.mark_optional_rect(new_bounds);
        self.last_preview_bounds = new_bounds;
    }

    /// Clears any cached preview bounds and marks their damage region.
    pub(crate) fn clear_preview_dirty(&mut self) {
        if let Some(prev) = self.last_preview_bounds.take() {
            self.dirty_tracker.mark_rect(prev);
        }
    }

    /// Updates dirty tracking for the live text preview/caret overlay.
    pub(crate) fn update_text_preview_dirty(&mut self) {
        let new_bounds = match &self.state {
            DrawingState::Typing(session) => text_preview_bounds(session),
            _ => None,
        };
        let previous = self.last_text_preview_bounds;

        if new_bounds != previous
            && let Some(prev) = previous
        {
            self.dirty_tracker.mark_rect(prev);
        }
        self.dirty_tracker.mark_optional_rect(new_bounds);
        self.last_text_preview_bounds = new_bounds;
    }

    /// Clears the cached text preview bounds.
    pub(crate) fn clear_text_preview_dirty(&mut self) {
        if let Some(prev) = self.last_text_preview_bounds.take() {
            self.dirty_tracker.mark_rect(prev);
        }
    }
}

/// Generous damage box for the text overlay: glyphs are assumed no wider
/// than the font size.
fn text_preview_bounds(session: &TextSession) -> Option<Rect> {
    let width = session.style.width;
    let font_size = util::text_font_size(width);
    let lines = session.content.split('\n');
    let (count, longest) = lines.fold((0usize, 0usize), |(count, longest), line| {
        (count + 1, longest.max(line.chars().count() + 1))
    });
    let box_width = TEXT_BOX_MIN_WIDTH.max(longest as f64 * font_size);
    let box_height = TEXT_BOX_MIN_HEIGHT.max(count as f64 * util::text_line_height(width));
    let anchor = session.anchor;
    Rect::covering(
        anchor.x,
        anchor.y,
        anchor.x + box_width,
        anchor.y + box_height,
        8.0 + width,
    )
}
