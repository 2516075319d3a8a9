use crate::draw::SurfaceError;
use crate::input::{
    events::{MouseButton, PointerDisposition},
    text::TextSession,
    tool::Tool,
};
use crate::util::Point;
use log::{debug, warn};

use super::{DrawingState, InputState};

impl InputState {
    /// Processes a pointer press. `position` is in client coordinates.
    ///
    /// # Behavior
    /// - Cursor tool: the event passes through to whatever is under the canvas
    /// - Non-primary buttons are ignored
    /// - An open text box is committed first (focus moves to the click)
    /// - Text tool: opens a new text box at the click
    /// - Freehand tools: opens a stroke on the raster
    /// - Shape tools: records the start; nothing is drawn until the first move
    pub fn on_pointer_down(&mut self, button: MouseButton, position: Point) -> PointerDisposition {
        if self.tool == Tool::Cursor {
            if matches!(self.state, DrawingState::Typing(_)) {
                self.commit_text();
            }
            return PointerDisposition::PassThrough;
        }
        if button != MouseButton::Left {
            return PointerDisposition::Ignored;
        }
        if matches!(self.state, DrawingState::Drawing { .. }) {
            return PointerDisposition::Ignored;
        }
        if matches!(self.state, DrawingState::Typing(_)) {
            self.commit_text();
        }
        if !self.is_mounted() {
            debug!("Pointer press before mount ignored");
            return PointerDisposition::Ignored;
        }

        self.settle_restores();
        let point = self.to_canvas(position);
        let tool = self.tool;
        let style = self.style;

        if tool == Tool::Text {
            debug!("Text box opened at ({:.1}, {:.1})", point.x, point.y);
            self.state = DrawingState::Typing(TextSession::new(point, style));
            self.update_text_preview_dirty();
            self.needs_redraw = true;
            return PointerDisposition::Handled;
        }

        if tool.is_freehand()
            && let Some(surfaces) = self.surfaces.as_mut()
        {
            surfaces.raster.begin_stroke(point, tool, style);
        }
        self.state = DrawingState::Drawing {
            tool,
            style,
            start: point,
            current: point,
        };
        PointerDisposition::Handled
    }

    /// Processes pointer motion. `position` is in client coordinates.
    ///
    /// # Behavior
    /// - Freehand gesture: paints a segment from the last point
    /// - Shape gesture: redraws the preview from the start to this point
    pub fn on_pointer_move(&mut self, position: Point) -> PointerDisposition {
        let point = self.to_canvas(position);
        let DrawingState::Drawing { tool, current, .. } = &mut self.state else {
            return if self.tool == Tool::Cursor {
                PointerDisposition::PassThrough
            } else {
                PointerDisposition::Ignored
            };
        };
        *current = point;
        let tool = *tool;

        if let Err(err) = self.route_motion(tool, point) {
            warn!("Failed to draw {} gesture: {}", tool, err);
        }
        self.needs_redraw = true;
        PointerDisposition::Handled
    }

    fn route_motion(&mut self, tool: Tool, point: Point) -> Result<(), SurfaceError> {
        let surfaces = self.surfaces.as_mut().ok_or(SurfaceError::NotMounted)?;
        if tool.is_freehand() {
            let damage = surfaces.raster.extend_stroke(point)?;
            self.dirty_tracker.mark_optional_rect(damage);
        } else if let Some((outline, style)) = self.state.shape_outline() {
            surfaces.preview.redraw(&outline, &style)?;
            self.update_preview_dirty();
        }
        Ok(())
    }

    /// Processes a pointer release. Releasing the primary button ends and
    /// commits the gesture in progress.
    pub fn on_pointer_up(&mut self, button: MouseButton, _position: Point) -> PointerDisposition {
        if button != MouseButton::Left {
            return PointerDisposition::Ignored;
        }
        if matches!(self.state, DrawingState::Drawing { .. }) {
            self.finish_gesture();
            return PointerDisposition::Handled;
        }
        if self.tool == Tool::Cursor {
            PointerDisposition::PassThrough
        } else {
            PointerDisposition::Ignored
        }
    }

    /// The pointer left the canvas. A gesture in progress commits exactly as
    /// on release.
    pub fn on_pointer_leave(&mut self) -> PointerDisposition {
        if matches!(self.state, DrawingState::Drawing { .. }) {
            self.finish_gesture();
            PointerDisposition::Handled
        } else {
            PointerDisposition::Ignored
        }
    }

    /// Ends a pointer gesture and commits what it drew.
    ///
    /// Every stopped gesture records a history entry, even one whose pointer
    /// never moved.
    pub(crate) fn finish_gesture(&mut self) {
        let DrawingState::Drawing { tool, .. } = std::mem::replace(&mut self.state, DrawingState::Idle)
        else {
            return;
        };
        let result = self.commit_gesture(tool);
        self.clear_preview_dirty();
        match result {
            Ok(()) => debug!(
                "{} gesture committed, history index {}",
                tool,
                self.history.index()
            ),
            Err(err) => warn!("Failed to commit {} gesture: {}", tool, err),
        }
        self.needs_redraw = true;
    }

    fn commit_gesture(&mut self, tool: Tool) -> Result<(), SurfaceError> {
        let surfaces = self.surfaces.as_mut().ok_or(SurfaceError::NotMounted)?;
        if tool.is_freehand() {
            surfaces.raster.end_stroke();
        } else {
            surfaces.raster.commit_shape(&mut surfaces.preview)?;
        }
        self.record_commit()
    }

    /// Discards a pointer gesture without recording anything.
    ///
    /// Freehand ink already painted is reverted by re-applying the history
    /// cursor.
    pub(crate) fn abort_gesture(&mut self) {
        let DrawingState::Drawing { tool, .. } = std::mem::replace(&mut self.state, DrawingState::Idle)
        else {
            return;
        };
        if let Some(surfaces) = self.surfaces.as_mut() {
            if tool.is_freehand() {
                surfaces.raster.end_stroke();
            } else if let Err(err) = surfaces.preview.clear() {
                warn!("Failed to clear shape preview: {}", err);
            }
        }
        if tool.is_freehand() {
            self.apply_history_cursor();
            self.settle_restores();
        }
        self.clear_preview_dirty();
        self.dirty_tracker.mark_full();
        self.needs_redraw = true;
        debug!("{} gesture aborted", tool);
    }
}
