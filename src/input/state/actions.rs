use crate::draw::SurfaceError;
use crate::input::{
    events::Key,
    modifiers::Modifiers,
    text::{self, TextEdit},
};
use log::{debug, info, warn};

use super::{DrawingState, InputState};

impl InputState {
    /// Processes a key press.
    ///
    /// Keys only matter while a text box is open: printable keys edit it,
    /// a modified Return inserts a line break, and plain Return commits it.
    /// Returns true when the key was consumed.
    pub fn on_key(&mut self, key: Key, modifiers: Modifiers) -> bool {
        let DrawingState::Typing(session) = &mut self.state else {
            return false;
        };
        match text::apply_key(session, key, modifiers) {
            TextEdit::Edited => {
                self.update_text_preview_dirty();
                self.needs_redraw = true;
                true
            }
            TextEdit::Commit => {
                self.commit_text();
                true
            }
            TextEdit::Unchanged => false,
        }
    }

    /// Inserts text (IME commit or paste) into the open text box.
    pub fn insert_text(&mut self, text: &str) -> bool {
        let DrawingState::Typing(session) = &mut self.state else {
            return false;
        };
        if text::insert_text(session, text) == TextEdit::Edited {
            self.update_text_preview_dirty();
            self.needs_redraw = true;
            true
        } else {
            false
        }
    }

    /// The text box lost focus. Same as committing it.
    pub fn on_text_blur(&mut self) {
        self.commit_text();
    }

    /// Commits the open text box into the raster and records it.
    ///
    /// Empty or whitespace-only content closes the box without creating a
    /// history entry.
    pub fn commit_text(&mut self) {
        let DrawingState::Typing(session) = std::mem::replace(&mut self.state, DrawingState::Idle)
        else {
            return;
        };
        self.clear_text_preview_dirty();
        self.needs_redraw = true;

        if !session.has_content() {
            debug!("Discarding empty text box");
            return;
        }
        let result = self
            .surfaces
            .as_mut()
            .ok_or(SurfaceError::NotMounted)
            .and_then(|surfaces| {
                surfaces.raster.commit_text(
                    session.anchor,
                    &session.content,
                    &session.style,
                    &self.font,
                )
            });
        match result {
            Ok(true) => {
                if let Err(err) = self.record_commit() {
                    warn!("Failed to record text commit: {}", err);
                } else {
                    debug!(
                        "Committed {} line(s) of text at ({:.1}, {:.1})",
                        session.content.split('\n').count(),
                        session.anchor.x,
                        session.anchor.y
                    );
                }
            }
            Ok(false) => debug!("Text box had nothing to draw"),
            Err(err) => warn!("Failed to commit text: {}", err),
        }
    }

    /// Handles a paste event.
    ///
    /// Image payloads become the background image. Plain text is typed into
    /// an open text box. Anything else is ignored. Returns true when the
    /// payload was used.
    pub fn on_paste(&mut self, mime: &str, bytes: &[u8]) -> bool {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            return match self.set_background_image(Some(bytes)) {
                Ok(()) => {
                    info!("Pasted {} as background image", mime);
                    true
                }
                Err(_) => false,
            };
        }
        if mime.starts_with("text/plain") && matches!(self.state, DrawingState::Typing(_)) {
            return match std::str::from_utf8(bytes) {
                Ok(text) => self.insert_text(text),
                Err(err) => {
                    warn!("Ignoring pasted text that is not UTF-8: {}", err);
                    false
                }
            };
        }
        debug!("Ignoring paste of {}", mime);
        false
    }

    /// Commits whatever gesture or text box is open.
    pub(crate) fn end_active_gesture(&mut self) {
        match self.state {
            DrawingState::Idle => {}
            DrawingState::Drawing { .. } => self.finish_gesture(),
            DrawingState::Typing(_) => self.commit_text(),
        }
    }

    /// Discards whatever gesture or text box is open.
    pub(crate) fn abort_active_gesture(&mut self) {
        match self.state {
            DrawingState::Idle => {}
            DrawingState::Drawing { .. } => self.abort_gesture(),
            DrawingState::Typing(_) => {
                self.state = DrawingState::Idle;
                self.clear_text_preview_dirty();
                self.needs_redraw = true;
                debug!("Text box discarded");
            }
        }
    }
}
