use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Margin, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use throbber_widgets_tui::Throbber;

use super::App;

impl App {
	pub(crate) fn draw(&mut self, frame: &mut Frame) {
		let area = frame.area().inner(Margin {
			vertical: 0,
			horizontal: 1,
		});

		let dropdown_height = if self.controller.is_open() {
			self.controller.suggestions().len() as u16 + 2
		} else {
			0
		};

		let layout = Layout::vertical([
			Constraint::Length(3),
			Constraint::Length(dropdown_height),
			Constraint::Length(1),
			Constraint::Min(0),
		])
		.split(area);

		self.render_prompt(frame, layout[0]);

		if dropdown_height > 0 {
			self.dropdown_area = Some(layout[1]);
			self.render_dropdown(frame, layout[1]);
		} else {
			self.dropdown_area = None;
		}

		self.render_status(frame, layout[2]);
	}

	fn render_prompt(&self, frame: &mut Frame, area: Rect) {
		let block = Block::default()
			.borders(Borders::ALL)
			.title(self.labels.prompt_title.as_str());
		let inner = block.inner(area);

		let text = self.input.text();
		let prompt = if text.is_empty() {
			Paragraph::new(self.labels.placeholder.as_str())
				.style(Style::default().add_modifier(Modifier::DIM))
		} else {
			Paragraph::new(text)
		};
		frame.render_widget(prompt.block(block), area);

		frame.set_cursor_position(Position::new(
			inner.x + self.input.cursor_column(),
			inner.y,
		));
	}

	fn render_dropdown(&mut self, frame: &mut Frame, area: Rect) {
		let items: Vec<ListItem> = self
			.controller
			.suggestions()
			.iter()
			.map(|item| ListItem::new(item.title.as_str()))
			.collect();

		let list = List::new(items)
			.block(Block::default().borders(Borders::ALL))
			.highlight_style(Style::default().add_modifier(Modifier::REVERSED));

		let mut state = ListState::default();
		state.select(self.controller.active_index());
		frame.render_stateful_widget(list, area, &mut state);
	}

	fn render_status(&mut self, frame: &mut Frame, area: Rect) {
		if self.controller.is_loading() {
			let throbber = Throbber::default().label("Fetching suggestions…");
			frame.render_stateful_widget(throbber, area, &mut self.throbber_state);
		} else {
			let hint = Paragraph::new(self.labels.hint.as_str())
				.style(Style::default().add_modifier(Modifier::DIM));
			frame.render_widget(hint, area);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::time::{Duration, Instant};

	use ratatui::Terminal;
	use ratatui::backend::TestBackend;
	use receptar_suggest::{DEFAULT_DEBOUNCE, FuzzyIndex, QueryController, SuggestionItem};

	use super::*;

	fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
		terminal
			.backend()
			.buffer()
			.content
			.iter()
			.map(|cell| cell.symbol())
			.collect()
	}

	#[test]
	fn draw_shows_prompt_title_and_open_dropdown() {
		let mut controller = QueryController::new(None);
		controller.install_index(FuzzyIndex::new([SuggestionItem::new(1, "Almás pite")]));
		let start = Instant::now();
		controller.set_text("almas", start);
		controller.poll(start + DEFAULT_DEBOUNCE + Duration::from_millis(1));

		let mut app = crate::App::new(controller, None, None);
		let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
		terminal.draw(|frame| app.draw(frame)).unwrap();

		let text = buffer_text(&terminal);
		assert!(text.contains("Recipe search"));
		assert!(text.contains("Almás pite"));
		assert!(app.dropdown_area.is_some());
	}

	#[test]
	fn dropdown_area_clears_when_closed() {
		let mut app = crate::App::new(QueryController::new(None), None, None);
		let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
		terminal.draw(|frame| app.draw(frame)).unwrap();

		assert!(app.dropdown_area.is_none());
		assert!(buffer_text(&terminal).contains("Search recipes or ingredients"));
	}
}
