//! Aggregate state for the interactive search session.

use std::sync::mpsc::{Receiver, TryRecvError};

use ratatui::layout::Rect;
use receptar_suggest::{FuzzyIndex, LookupResolution, QueryController};
use throbber_widgets_tui::ThrobberState;
use tracing::debug;

use crate::config::UiLabels;
use crate::input::QueryInput;

/// Bundles the controller with its worker channels and the UI caches.
///
/// The `App` owns everything for the lifetime of one search session; the
/// fetch worker and bootstrap thread only ever reach it through the
/// receivers pumped from the event loop.
pub struct App {
	pub(crate) controller: QueryController,
	pub(crate) input: QueryInput,
	pub(crate) resolutions: Option<Receiver<LookupResolution>>,
	pub(crate) index_updates: Option<Receiver<FuzzyIndex>>,
	pub(crate) labels: UiLabels,
	pub(crate) throbber_state: ThrobberState,
	pub(crate) dropdown_area: Option<Rect>,
}

impl App {
	/// Build the session around a controller and its worker channels.
	///
	/// Either receiver may be absent when no backend is configured; the
	/// session then runs on whatever the controller can answer by itself.
	pub fn new(
		controller: QueryController,
		resolutions: Option<Receiver<LookupResolution>>,
		index_updates: Option<Receiver<FuzzyIndex>>,
	) -> Self {
		let input = QueryInput::new(controller.raw_text());
		Self {
			controller,
			input,
			resolutions,
			index_updates,
			labels: UiLabels::default(),
			throbber_state: ThrobberState::default(),
			dropdown_area: None,
		}
	}

	#[must_use]
	pub fn with_labels(mut self, labels: UiLabels) -> Self {
		self.labels = labels;
		self
	}

	/// Install the fuzzy index once the bootstrap thread delivers it.
	pub(crate) fn pump_index_updates(&mut self) {
		let Some(updates) = &self.index_updates else {
			return;
		};
		loop {
			match updates.try_recv() {
				Ok(index) => {
					debug!(entries = index.len(), "fuzzy index installed");
					self.controller.install_index(index);
				}
				Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
			}
		}
	}

	/// Drain completed lookups; the controller's token rule decides what
	/// actually lands.
	pub(crate) fn pump_lookup_resolutions(&mut self) {
		let Some(resolutions) = &self.resolutions else {
			return;
		};
		loop {
			match resolutions.try_recv() {
				Ok(resolution) => self
					.controller
					.resolve_lookup(resolution.token, resolution.items),
				Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::time::{Duration, Instant};

	use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
	use receptar_suggest::{DEFAULT_DEBOUNCE, FuzzyIndex, SuggestionItem};

	use super::*;

	fn press(code: KeyCode) -> KeyEvent {
		KeyEvent::new(code, KeyModifiers::NONE)
	}

	fn type_text(app: &mut App, text: &str, now: Instant) {
		for c in text.chars() {
			assert!(app.handle_key(press(KeyCode::Char(c)), now).is_none());
		}
	}

	#[test]
	fn enter_submits_the_prompt_verbatim() {
		let mut app = App::new(QueryController::new(None), None, None);
		let now = Instant::now();
		type_text(&mut app, "bográcsgulyás", now);

		let outcome = app.handle_key(press(KeyCode::Enter), now).expect("outcome");
		assert!(outcome.accepted);
		let navigation = outcome.navigation.expect("navigation");
		assert_eq!(navigation.query(), "bográcsgulyás");
	}

	#[test]
	fn enter_on_blank_prompt_keeps_the_session_running() {
		let mut app = App::new(QueryController::new(None), None, None);
		assert!(app.handle_key(press(KeyCode::Enter), Instant::now()).is_none());
	}

	#[test]
	fn esc_cancels_with_the_current_query() {
		let mut app = App::new(QueryController::new(None), None, None);
		let now = Instant::now();
		type_text(&mut app, "túrós", now);

		let outcome = app.handle_key(press(KeyCode::Esc), now).expect("outcome");
		assert!(!outcome.accepted);
		assert_eq!(outcome.query, "túrós");
		assert!(outcome.navigation.is_none());
	}

	#[test]
	fn highlighted_suggestion_wins_over_plain_submit() {
		let mut controller = QueryController::new(None);
		controller.install_index(FuzzyIndex::new([
			SuggestionItem::new(1, "Almás pite").with_slug("almas-pite"),
			SuggestionItem::new(2, "Almás torta"),
		]));
		let mut app = App::new(controller, None, None);

		let start = Instant::now();
		type_text(&mut app, "almas", start);
		app.controller.poll(start + DEFAULT_DEBOUNCE + Duration::from_millis(1));
		assert!(app.controller.is_open());

		app.handle_key(press(KeyCode::Down), start);
		let outcome = app.handle_key(press(KeyCode::Enter), start).expect("outcome");

		let navigation = outcome.navigation.expect("navigation");
		assert_eq!(navigation.query(), "Almás pite");
		assert_eq!(navigation.slug(), Some("almas-pite"));
		// The selection echoes back into the visible prompt.
		assert_eq!(app.input.text(), "Almás pite");
	}
}
