//! Shared value types flowing between the controller, the fetch worker, and
//! the UI layer.

/// One searchable entry of the backing collection.
///
/// Instances are produced when the bulk listing is fetched (to seed the
/// fuzzy index) or when a remote suggestion response is parsed, and live only
/// as long as the search session that requested them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionItem {
	/// Stable identifier, unique within a suggestion list.
	pub id: u64,
	/// Display text; all matching runs against this, case-insensitively.
	pub title: String,
	/// Routing key of the entry's detail page, when the backend exposes one.
	pub slug: Option<String>,
}

impl SuggestionItem {
	pub fn new(id: u64, title: impl Into<String>) -> Self {
		Self {
			id,
			title: title.into(),
			slug: None,
		}
	}

	#[must_use]
	pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
		self.slug = Some(slug.into());
		self
	}
}

/// Snapshot of the prompt text at the moment a lookup was initiated.
///
/// A resolution is applied only while its token still matches the live prompt
/// text, which is what renders slow, out-of-order lookups inert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryToken {
	id: u64,
	text: String,
}

impl QueryToken {
	#[must_use]
	pub fn new(id: u64, text: impl Into<String>) -> Self {
		Self {
			id,
			text: text.into(),
		}
	}

	/// Monotonic sequence number of the lookup this token belongs to.
	#[must_use]
	pub fn id(&self) -> u64 {
		self.id
	}

	/// The prompt text as it read when the lookup was initiated.
	#[must_use]
	pub fn text(&self) -> &str {
		&self.text
	}
}

/// Navigation instruction produced by a submit or a suggestion selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
	query: String,
	slug: Option<String>,
}

impl Navigation {
	pub(crate) fn new(query: String, slug: Option<String>) -> Self {
		Self { query, slug }
	}

	/// The text the results view should search for.
	#[must_use]
	pub fn query(&self) -> &str {
		&self.query
	}

	/// Routing key of the selected entry, when navigation came from a
	/// suggestion rather than a plain submit.
	#[must_use]
	pub fn slug(&self) -> Option<&str> {
		self.slug.as_deref()
	}

	/// Render the results-view URL with the query URL-encoded.
	#[must_use]
	pub fn results_url(&self, search_path: &str) -> String {
		format!("{search_path}?query={}", urlencoding::encode(&self.query))
	}
}

/// Terminal state of an interactive search session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
	/// Whether the user accepted (submit/selection) rather than cancelled.
	pub accepted: bool,
	/// The prompt text at the moment the session ended.
	pub query: String,
	/// Where to go next; present exactly when `accepted` is true.
	pub navigation: Option<Navigation>,
}
