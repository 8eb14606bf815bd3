//! Single-line prompt input with cursor editing.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

/// Owns the typed text and the cursor position (in characters).
///
/// The widget only edits; the [`QueryController`](receptar_suggest::QueryController)
/// is told about every text change by the caller.
#[derive(Debug, Default)]
pub struct QueryInput {
	text: String,
	cursor: usize,
}

impl QueryInput {
	pub fn new(text: impl Into<String>) -> Self {
		let text = text.into();
		let cursor = text.chars().count();
		Self { text, cursor }
	}

	#[must_use]
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Replace the text wholesale, cursor at the end (the selection-echo
	/// path).
	pub fn set_text(&mut self, text: impl Into<String>) {
		self.text = text.into();
		self.cursor = self.text.chars().count();
	}

	/// Terminal-column width of the text before the cursor, for cursor
	/// placement.
	#[must_use]
	pub fn cursor_column(&self) -> u16 {
		let prefix: String = self.text.chars().take(self.cursor).collect();
		prefix.width() as u16
	}

	/// Apply a key event; returns `true` when the text itself changed.
	pub fn input(&mut self, key: KeyEvent) -> bool {
		match key.code {
			KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
				self.insert(c);
				true
			}
			KeyCode::Backspace => self.backspace(),
			KeyCode::Delete => self.delete(),
			KeyCode::Left => {
				self.cursor = self.cursor.saturating_sub(1);
				false
			}
			KeyCode::Right => {
				self.cursor = (self.cursor + 1).min(self.text.chars().count());
				false
			}
			KeyCode::Home => {
				self.cursor = 0;
				false
			}
			KeyCode::End => {
				self.cursor = self.text.chars().count();
				false
			}
			_ => false,
		}
	}

	fn byte_offset(&self, char_index: usize) -> usize {
		self.text
			.char_indices()
			.nth(char_index)
			.map(|(offset, _)| offset)
			.unwrap_or(self.text.len())
	}

	fn insert(&mut self, c: char) {
		let offset = self.byte_offset(self.cursor);
		self.text.insert(offset, c);
		self.cursor += 1;
	}

	fn backspace(&mut self) -> bool {
		if self.cursor == 0 {
			return false;
		}
		self.cursor -= 1;
		let offset = self.byte_offset(self.cursor);
		self.text.remove(offset);
		true
	}

	fn delete(&mut self) -> bool {
		if self.cursor >= self.text.chars().count() {
			return false;
		}
		let offset = self.byte_offset(self.cursor);
		self.text.remove(offset);
		true
	}
}
