//! Debounced query controller.
//!
//! The [`QueryController`] mediates between raw keystrokes and the two
//! suggestion sources, sequencing lookups so that a slow earlier request can
//! never overwrite a faster later one. All state lives on the UI thread; the
//! remote side only ever talks back through [`LookupResolution`] messages.

use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::fuzzy::FuzzyIndex;
use crate::types::{Navigation, QueryToken, SuggestionItem};

/// Quiet period between the last keystroke and a lookup.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default cap on rendered suggestions.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Lookup handed to the background fetch worker.
#[derive(Debug, Clone)]
pub struct LookupRequest {
	pub token: QueryToken,
	pub limit: usize,
}

/// Completed lookup travelling back to the controller.
///
/// Failed fetches arrive as an empty `items` list; the worker never surfaces
/// an error across this channel.
#[derive(Debug, Clone)]
pub struct LookupResolution {
	pub token: QueryToken,
	pub items: Vec<SuggestionItem>,
}

/// Direction for keyboard navigation over the dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
	Up,
	Down,
}

/// Single cancellable deadline; arming always replaces the previous one.
#[derive(Debug)]
struct Debounce {
	delay: Duration,
	deadline: Option<Instant>,
}

impl Debounce {
	fn new(delay: Duration) -> Self {
		Self {
			delay,
			deadline: None,
		}
	}

	fn arm(&mut self, now: Instant) {
		self.deadline = Some(now + self.delay);
	}

	fn cancel(&mut self) {
		self.deadline = None;
	}

	/// True exactly once per armed deadline, after it has elapsed.
	fn fired(&mut self, now: Instant) -> bool {
		match self.deadline {
			Some(deadline) if now >= deadline => {
				self.deadline = None;
				true
			}
			_ => false,
		}
	}

	#[cfg(test)]
	fn is_armed(&self) -> bool {
		self.deadline.is_some()
	}
}

/// State machine behind the search prompt.
///
/// Owns the prompt text, the debounce deadline, and the dropdown state, and
/// enforces the token rule: a lookup result is applied only while its token
/// still matches the live prompt text.
pub struct QueryController {
	raw_text: String,
	debounce: Debounce,
	limit: usize,
	suggestions: Vec<SuggestionItem>,
	is_open: bool,
	is_loading: bool,
	active_index: Option<usize>,
	index: Option<FuzzyIndex>,
	remote: Option<Sender<LookupRequest>>,
	next_token_id: u64,
	pending_token: Option<u64>,
}

impl QueryController {
	/// Create a controller wired to an optional remote lookup channel.
	///
	/// `None` models the unconfigured-backend case: lookups that cannot be
	/// answered locally resolve empty instead of erroring.
	pub fn new(remote: Option<Sender<LookupRequest>>) -> Self {
		Self {
			raw_text: String::new(),
			debounce: Debounce::new(DEFAULT_DEBOUNCE),
			limit: DEFAULT_SUGGESTION_LIMIT,
			suggestions: Vec::new(),
			is_open: false,
			is_loading: false,
			active_index: None,
			index: None,
			remote,
			next_token_id: 0,
			pending_token: None,
		}
	}

	#[must_use]
	pub fn with_debounce(mut self, delay: Duration) -> Self {
		self.debounce = Debounce::new(delay);
		self
	}

	#[must_use]
	pub fn with_limit(mut self, limit: usize) -> Self {
		self.limit = limit.max(1);
		self
	}

	/// Current prompt text, exactly as typed.
	#[must_use]
	pub fn raw_text(&self) -> &str {
		&self.raw_text
	}

	/// Suggestions from the most recent applied lookup, best first.
	#[must_use]
	pub fn suggestions(&self) -> &[SuggestionItem] {
		&self.suggestions
	}

	#[must_use]
	pub fn is_open(&self) -> bool {
		self.is_open
	}

	/// Whether a remote lookup is in flight.
	#[must_use]
	pub fn is_loading(&self) -> bool {
		self.is_loading
	}

	/// Keyboard-highlighted suggestion; `None` plays the role of "-1".
	#[must_use]
	pub fn active_index(&self) -> Option<usize> {
		self.active_index
	}

	#[must_use]
	pub fn active_suggestion(&self) -> Option<&SuggestionItem> {
		self.active_index
			.and_then(|index| self.suggestions.get(index))
	}

	/// Install the fuzzy index once the bulk snapshot has been fetched.
	///
	/// From this point lookups are answered locally; a remote resolution
	/// still in flight stays subject to the token rule like any other.
	pub fn install_index(&mut self, index: FuzzyIndex) {
		self.index = Some(index);
	}

	#[must_use]
	pub fn has_index(&self) -> bool {
		self.index.is_some()
	}

	/// Update the prompt text and re-arm the debounce timer.
	///
	/// Empty-after-trim input short-circuits: suggestions are cleared and
	/// the dropdown closed without waiting out a debounce period.
	pub fn set_text(&mut self, new_text: impl Into<String>, now: Instant) {
		self.raw_text = new_text.into();
		self.debounce.cancel();

		if self.raw_text.trim().is_empty() {
			self.suggestions = Vec::new();
			self.is_open = false;
			self.is_loading = false;
			self.active_index = None;
			self.pending_token = None;
			return;
		}

		self.debounce.arm(now);
	}

	/// Advance the debounce clock, initiating at most one lookup per quiet
	/// period. Call this from the UI tick loop.
	pub fn poll(&mut self, now: Instant) {
		if self.debounce.fired(now) {
			self.begin_lookup();
		}
	}

	fn next_token(&mut self) -> QueryToken {
		self.next_token_id += 1;
		QueryToken::new(self.next_token_id, self.raw_text.clone())
	}

	/// Snapshot the prompt into a token and consult the best available
	/// source: local index first, remote fallback second, empty otherwise.
	fn begin_lookup(&mut self) {
		let token = self.next_token();

		if let Some(index) = &self.index {
			let items = index.search(token.text(), self.limit);
			self.resolve_lookup(token, items);
			return;
		}

		match &self.remote {
			Some(remote) => {
				self.is_loading = true;
				self.pending_token = Some(token.id());
				let request = LookupRequest {
					token: token.clone(),
					limit: self.limit,
				};
				if remote.send(request).is_err() {
					warn!("suggestion worker is gone; resolving lookup empty");
					self.resolve_lookup(token, Vec::new());
				}
			}
			None => {
				debug!("no suggestion source available for query");
				self.resolve_lookup(token, Vec::new());
			}
		}
	}

	/// Apply a completed lookup, unless its token has gone stale.
	///
	/// The suggestion list is replaced wholesale so the dropdown never
	/// shows a mix of old and new items.
	pub fn resolve_lookup(&mut self, token: QueryToken, mut items: Vec<SuggestionItem>) {
		if self.pending_token == Some(token.id()) {
			self.is_loading = false;
			self.pending_token = None;
		}

		if token.text() != self.raw_text {
			debug!(token = token.text(), "discarding stale lookup result");
			return;
		}

		items.truncate(self.limit);
		self.is_open = !items.is_empty();
		self.active_index = None;
		self.suggestions = items;
	}

	/// Accept a suggestion: echo its title into the prompt, close the
	/// dropdown, and emit the navigation for it.
	pub fn select_suggestion(&mut self, item: &SuggestionItem) -> Navigation {
		self.cancel_pending();
		self.raw_text = item.title.clone();
		self.is_open = false;
		self.active_index = None;
		Navigation::new(item.title.clone(), item.slug.clone())
	}

	/// Submit the prompt as typed. No-op (returns `None`) on blank text;
	/// does not depend on any lookup having completed.
	pub fn submit(&mut self) -> Option<Navigation> {
		let trimmed = self.raw_text.trim();
		if trimmed.is_empty() {
			return None;
		}
		let query = trimmed.to_string();
		self.cancel_pending();
		self.is_open = false;
		self.active_index = None;
		Some(Navigation::new(query, None))
	}

	/// Move the keyboard highlight with wraparound.
	///
	/// Down on a closed-but-populated dropdown re-opens it at index 0; the
	/// "no highlight" state is excluded from the wrap cycle.
	pub fn move_active(&mut self, direction: Direction) {
		if self.suggestions.is_empty() {
			return;
		}

		if !self.is_open {
			if direction == Direction::Down {
				self.is_open = true;
				self.active_index = Some(0);
			}
			return;
		}

		let len = self.suggestions.len();
		self.active_index = Some(match (self.active_index, direction) {
			(None, Direction::Down) => 0,
			(None, Direction::Up) => len - 1,
			(Some(current), Direction::Down) => (current + 1) % len,
			(Some(current), Direction::Up) => (current + len - 1) % len,
		});
	}

	/// Close the dropdown without touching the prompt text or the cached
	/// suggestions (the click-outside path).
	pub fn close_dropdown(&mut self) {
		self.is_open = false;
		self.active_index = None;
	}

	fn cancel_pending(&mut self) {
		self.debounce.cancel();
		self.pending_token = None;
		self.is_loading = false;
	}
}

#[cfg(test)]
mod tests {
	use std::sync::mpsc::{Receiver, channel};

	use super::*;

	fn remote_controller() -> (QueryController, Receiver<LookupRequest>) {
		let (tx, rx) = channel();
		(QueryController::new(Some(tx)), rx)
	}

	fn fire(controller: &mut QueryController, armed_at: Instant) {
		controller.poll(armed_at + DEFAULT_DEBOUNCE);
	}

	#[test]
	fn debounce_coalesces_rapid_keystrokes() {
		let (mut controller, requests) = remote_controller();
		let start = Instant::now();

		controller.set_text("gulyas", start);
		let retyped = start + Duration::from_millis(100);
		controller.set_text("gulyasleves", retyped);

		// First deadline would have fallen here; nothing may fire yet.
		controller.poll(start + DEFAULT_DEBOUNCE);
		assert!(requests.try_recv().is_err());

		fire(&mut controller, retyped);
		let request = requests.try_recv().expect("one lookup");
		assert_eq!(request.token.text(), "gulyasleves");
		assert!(requests.try_recv().is_err());
	}

	#[test]
	fn empty_input_clears_immediately_without_lookup() {
		let (mut controller, requests) = remote_controller();
		let start = Instant::now();

		controller.set_text("rétes", start);
		fire(&mut controller, start);
		let token = requests.try_recv().expect("lookup issued").token;
		controller.resolve_lookup(token, vec![SuggestionItem::new(1, "Rétes")]);
		assert!(controller.is_open());

		controller.set_text("   ", start + Duration::from_secs(1));
		assert!(controller.suggestions().is_empty());
		assert!(!controller.is_open());
		assert!(!controller.is_loading());
		assert_eq!(controller.active_index(), None);

		// No debounce was armed for the empty case.
		controller.poll(start + Duration::from_secs(2));
		assert!(requests.try_recv().is_err());
	}

	#[test]
	fn submit_navigates_without_any_lookup_completed() {
		let (mut controller, _requests) = remote_controller();
		controller.set_text("  bográcsgulyás ", Instant::now());

		let navigation = controller.submit().expect("navigation");
		assert_eq!(navigation.query(), "bográcsgulyás");
		assert!(!controller.is_open());
	}

	#[test]
	fn submit_on_blank_text_is_a_no_op() {
		let (mut controller, _requests) = remote_controller();
		controller.set_text("   ", Instant::now());
		assert!(controller.submit().is_none());
	}

	#[test]
	fn stale_token_cannot_clobber_newer_result() {
		let (mut controller, requests) = remote_controller();
		let start = Instant::now();

		controller.set_text("cat", start);
		fire(&mut controller, start);
		let older = requests.try_recv().expect("first lookup").token;

		let retyped = start + Duration::from_secs(1);
		controller.set_text("cats", retyped);
		fire(&mut controller, retyped);
		let newer = requests.try_recv().expect("second lookup").token;

		controller.resolve_lookup(newer, vec![SuggestionItem::new(2, "cats")]);
		controller.resolve_lookup(older, vec![SuggestionItem::new(1, "cat")]);

		assert_eq!(controller.suggestions().len(), 1);
		assert_eq!(controller.suggestions()[0].title, "cats");
	}

	#[test]
	fn failed_lookup_resolves_empty_and_quiet() {
		let (mut controller, requests) = remote_controller();
		let start = Instant::now();

		controller.set_text("xyz123", start);
		fire(&mut controller, start);
		let token = requests.try_recv().expect("lookup issued").token;
		assert!(controller.is_loading());

		// The worker maps HTTP failures onto an empty resolution.
		controller.resolve_lookup(token, Vec::new());
		assert!(!controller.is_loading());
		assert!(!controller.is_open());
		assert!(controller.suggestions().is_empty());
	}

	#[test]
	fn results_are_capped_at_the_limit() {
		let (mut controller, requests) = remote_controller();
		let start = Instant::now();

		controller.set_text("leves", start);
		fire(&mut controller, start);
		let token = requests.try_recv().expect("lookup issued").token;

		let oversized = (0..9)
			.map(|i| SuggestionItem::new(i, format!("leves {i}")))
			.collect();
		controller.resolve_lookup(token, oversized);
		assert_eq!(controller.suggestions().len(), DEFAULT_SUGGESTION_LIMIT);
	}

	#[test]
	fn arrow_down_reopens_cached_dropdown_at_first_entry() {
		let (mut controller, requests) = remote_controller();
		let start = Instant::now();

		controller.set_text("palacsinta", start);
		fire(&mut controller, start);
		let token = requests.try_recv().expect("lookup issued").token;
		controller.resolve_lookup(
			token,
			vec![
				SuggestionItem::new(1, "Palacsinta"),
				SuggestionItem::new(2, "Palacsintatorta"),
			],
		);

		controller.close_dropdown();
		assert!(!controller.is_open());
		assert_eq!(controller.suggestions().len(), 2);

		controller.move_active(Direction::Down);
		assert!(controller.is_open());
		assert_eq!(controller.active_index(), Some(0));
	}

	#[test]
	fn highlight_wraps_in_both_directions() {
		let (mut controller, requests) = remote_controller();
		let start = Instant::now();

		controller.set_text("torta", start);
		fire(&mut controller, start);
		let token = requests.try_recv().expect("lookup issued").token;
		controller.resolve_lookup(
			token,
			vec![
				SuggestionItem::new(1, "Dobostorta"),
				SuggestionItem::new(2, "Sajttorta"),
			],
		);

		controller.move_active(Direction::Down);
		controller.move_active(Direction::Down);
		assert_eq!(controller.active_index(), Some(1));
		controller.move_active(Direction::Down);
		assert_eq!(controller.active_index(), Some(0));
		controller.move_active(Direction::Up);
		assert_eq!(controller.active_index(), Some(1));
	}

	#[test]
	fn selection_echoes_title_and_emits_one_navigation() {
		let (mut controller, _requests) = remote_controller();
		controller.set_text("csok", Instant::now());

		let item = SuggestionItem::new(7, "Csokis brownie").with_slug("csokis-brownie");
		let navigation = controller.select_suggestion(&item);

		assert_eq!(controller.raw_text(), "Csokis brownie");
		assert!(!controller.is_open());
		assert_eq!(controller.active_index(), None);
		assert_eq!(navigation.query(), "Csokis brownie");
		assert_eq!(navigation.slug(), Some("csokis-brownie"));
		assert!(!controller.debounce.is_armed());
	}

	#[test]
	fn local_index_short_circuits_the_remote_path() {
		let (mut controller, requests) = remote_controller();
		controller.install_index(FuzzyIndex::new([
			SuggestionItem::new(1, "Almás pite"),
			SuggestionItem::new(2, "Almás torta"),
		]));

		assert!(controller.has_index());
		let start = Instant::now();
		controller.set_text("almas", start);
		fire(&mut controller, start);

		assert!(requests.try_recv().is_err());
		assert_eq!(controller.suggestions().len(), 2);
		assert!(controller.is_open());
		assert!(!controller.is_loading());
	}

	#[test]
	fn missing_remote_resolves_empty_instead_of_hanging() {
		let mut controller = QueryController::new(None);
		let start = Instant::now();

		controller.set_text("anything", start);
		fire(&mut controller, start);

		assert!(!controller.is_loading());
		assert!(controller.suggestions().is_empty());
		assert!(!controller.is_open());
	}

	#[test]
	fn late_resolution_after_index_install_still_respects_token() {
		let (mut controller, requests) = remote_controller();
		let start = Instant::now();

		controller.set_text("piskóta", start);
		fire(&mut controller, start);
		let token = requests.try_recv().expect("lookup issued").token;

		controller.install_index(FuzzyIndex::new([SuggestionItem::new(1, "Piskóta")]));
		controller.resolve_lookup(token, vec![SuggestionItem::new(9, "remote piskóta")]);

		// Text still matches, so the remote result lands even though the
		// index arrived in between.
		assert_eq!(controller.suggestions()[0].id, 9);
	}
}
