//! Text-entry overlay state.

use super::events::Key;
use super::modifiers::Modifiers;
use crate::draw::Style;
use crate::util::Point;

/// A transient text box anchored on the canvas.
///
/// The style is captured when the session starts.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSession {
    pub anchor: Point,
    pub content: String,
    pub style: Style,
}

impl TextSession {
    pub fn new(anchor: Point, style: Style) -> Self {
        Self {
            anchor,
            content: String::new(),
            style,
        }
    }

    /// False when committing would produce nothing.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// What a key press did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    /// Content changed
    Edited,
    /// The session should be committed
    Commit,
    /// The key had no effect
    Unchanged,
}

/// Applies a key press to the session content.
///
/// Return without modifiers commits; a modified Return inserts a line break.
/// Escape is ignored, the box stays open until Return or a blur.
pub fn apply_key(session: &mut TextSession, key: Key, modifiers: Modifiers) -> TextEdit {
    match key {
        Key::Return if modifiers.any() => {
            session.content.push('\n');
            TextEdit::Edited
        }
        Key::Return => TextEdit::Commit,
        Key::Backspace => {
            if session.content.pop().is_some() {
                TextEdit::Edited
            } else {
                TextEdit::Unchanged
            }
        }
        Key::Space => {
            session.content.push(' ');
            TextEdit::Edited
        }
        Key::Tab => {
            session.content.push('\t');
            TextEdit::Edited
        }
        Key::Char(c) if !c.is_control() => {
            session.content.push(c);
            TextEdit::Edited
        }
        Key::Escape | Key::Char(_) | Key::Unknown => TextEdit::Unchanged,
    }
}

/// Inserts pasted text into the session, normalizing line endings.
pub fn insert_text(session: &mut TextSession, text: &str) -> TextEdit {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    if normalized.is_empty() {
        return TextEdit::Unchanged;
    }
    session.content.push_str(&normalized);
    TextEdit::Edited
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> TextSession {
        TextSession::new(Point::new(50.0, 50.0), Style::default())
    }

    #[test]
    fn typing_builds_content() {
        let mut s = session();
        for c in "Hi".chars() {
            assert_eq!(apply_key(&mut s, Key::Char(c), Modifiers::new()), TextEdit::Edited);
        }
        apply_key(&mut s, Key::Space, Modifiers::new());
        apply_key(&mut s, Key::Char('!'), Modifiers::new());
        assert_eq!(s.content, "Hi !");
        apply_key(&mut s, Key::Backspace, Modifiers::new());
        assert_eq!(s.content, "Hi ");
    }

    #[test]
    fn plain_return_commits_and_shift_return_breaks_line() {
        let mut s = session();
        apply_key(&mut s, Key::Char('A'), Modifiers::new());
        assert_eq!(apply_key(&mut s, Key::Return, Modifiers::shift()), TextEdit::Edited);
        apply_key(&mut s, Key::Char('B'), Modifiers::new());
        assert_eq!(s.content, "A\nB");
        assert_eq!(apply_key(&mut s, Key::Return, Modifiers::new()), TextEdit::Commit);
        assert_eq!(apply_key(&mut s, Key::Escape, Modifiers::new()), TextEdit::Unchanged);
        assert_eq!(s.content, "A\nB");
    }

    #[test]
    fn whitespace_only_session_has_no_content() {
        let mut s = session();
        insert_text(&mut s, " \r\n ");
        assert_eq!(s.content, " \n ");
        assert!(!s.has_content());
        assert_eq!(apply_key(&mut session(), Key::Backspace, Modifiers::new()), TextEdit::Unchanged);
    }
}
