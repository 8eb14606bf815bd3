use std::time::Instant;

use ratatui::crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use receptar_suggest::{Direction, SearchOutcome};

use super::App;

impl App {
	/// Process a keyboard event; returns an outcome when the session ends.
	pub(crate) fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<SearchOutcome> {
		match key.code {
			KeyCode::Esc => Some(SearchOutcome {
				accepted: false,
				query: self.controller.raw_text().to_string(),
				navigation: None,
			}),
			KeyCode::Enter => {
				if let Some(item) = self.controller.active_suggestion().cloned() {
					let navigation = self.controller.select_suggestion(&item);
					self.input.set_text(self.controller.raw_text());
					Some(SearchOutcome {
						accepted: true,
						query: self.controller.raw_text().to_string(),
						navigation: Some(navigation),
					})
				} else {
					self.controller.submit().map(|navigation| SearchOutcome {
						accepted: true,
						query: self.controller.raw_text().to_string(),
						navigation: Some(navigation),
					})
				}
			}
			KeyCode::Down => {
				self.controller.move_active(Direction::Down);
				None
			}
			KeyCode::Up => {
				self.controller.move_active(Direction::Up);
				None
			}
			_ => {
				if self.input.input(key) {
					self.controller.set_text(self.input.text(), now);
				}
				None
			}
		}
	}

	/// Process a mouse event; a click on a dropdown row selects it, a click
	/// anywhere else closes the dropdown without touching the prompt.
	pub(crate) fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<SearchOutcome> {
		if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
			return None;
		}

		if let Some(row) = self.dropdown_hit(mouse.column, mouse.row)
			&& let Some(item) = self.controller.suggestions().get(row).cloned()
		{
			let navigation = self.controller.select_suggestion(&item);
			self.input.set_text(self.controller.raw_text());
			return Some(SearchOutcome {
				accepted: true,
				query: self.controller.raw_text().to_string(),
				navigation: Some(navigation),
			});
		}

		self.controller.close_dropdown();
		None
	}

	/// Map a click position onto a dropdown row, accounting for the list
	/// border.
	fn dropdown_hit(&self, column: u16, row: u16) -> Option<usize> {
		if !self.controller.is_open() {
			return None;
		}
		let area = self.dropdown_area?;
		let inside_x = column > area.x && column < area.x.saturating_add(area.width).saturating_sub(1);
		let inside_y = row > area.y && row < area.y.saturating_add(area.height).saturating_sub(1);
		if !inside_x || !inside_y {
			return None;
		}
		let index = usize::from(row - area.y - 1);
		(index < self.controller.suggestions().len()).then_some(index)
	}
}
