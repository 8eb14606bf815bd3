//! In-memory fuzzy title index.
//!
//! Built once from the bulk listing snapshot and immutable afterwards; every
//! query runs synchronously against precomputed, fold-normalized keys so a
//! keystroke never waits on the network.

use std::collections::HashSet;

use frizbee::{Config, match_list};

use crate::types::SuggestionItem;

/// Dataset size at which the matcher's prefilter pays for itself.
pub const PREFILTER_ENABLE_THRESHOLD: usize = 1_000;

/// Lowercase, diacritic-folded matching key for a title.
///
/// Both the indexed titles and incoming queries pass through this, so
/// "almas" matches "Almás" without either side carrying accents.
fn fold_key(text: &str) -> String {
	deunicode::deunicode(text).to_lowercase()
}

/// Matcher options tuned to the query length and dataset size.
///
/// The typo budget grows with the query so short inputs stay precise while
/// longer ones absorb misspellings; this is the engine's match-tolerance
/// knob.
fn config_for_query(query: &str, dataset_len: usize) -> Config {
	let mut config = Config::default();

	let length = query.chars().count();
	let mut allowed_typos: u16 = match length {
		0 | 1 => 0,
		2..=4 => 1,
		5..=7 => 2,
		8..=12 => 3,
		_ => 4,
	};
	if let Ok(max_reasonable) = u16::try_from(length.saturating_sub(1)) {
		allowed_typos = allowed_typos.min(max_reasonable);
	}

	if dataset_len >= PREFILTER_ENABLE_THRESHOLD {
		config.max_typos = Some(allowed_typos);
	} else {
		config.max_typos = None;
	}

	config.sort = false;

	config
}

/// Read-only approximate-match index over suggestion titles.
///
/// Construction deduplicates by `id` (first occurrence wins) and
/// precomputes folded keys; queries never mutate the index, so a built
/// instance can be handed to the UI thread and shared freely.
#[derive(Debug, Clone)]
pub struct FuzzyIndex {
	items: Vec<SuggestionItem>,
	keys: Vec<String>,
}

impl FuzzyIndex {
	pub fn new(items: impl IntoIterator<Item = SuggestionItem>) -> Self {
		let mut seen = HashSet::new();
		let mut deduped = Vec::new();
		for item in items {
			if seen.insert(item.id) {
				deduped.push(item);
			}
		}
		let keys = deduped.iter().map(|item| fold_key(&item.title)).collect();
		Self {
			items: deduped,
			keys,
		}
	}

	/// Number of indexed entries.
	#[must_use]
	pub fn len(&self) -> usize {
		self.items.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Return up to `limit` entries ordered by match quality, best first.
	///
	/// Blank and whitespace-only queries yield nothing regardless of index
	/// contents. Ties rank in insertion order, so repeated calls with the
	/// same arguments produce identical output.
	#[must_use]
	pub fn search(&self, query: &str, limit: usize) -> Vec<SuggestionItem> {
		let trimmed = query.trim();
		if trimmed.is_empty() || limit == 0 {
			return Vec::new();
		}

		let needle = fold_key(trimmed);
		let config = config_for_query(&needle, self.keys.len());
		let haystacks: Vec<&str> = self.keys.iter().map(String::as_str).collect();

		let mut ranked: Vec<(usize, u16)> = match_list(&needle, &haystacks, &config)
			.into_iter()
			.filter(|entry| entry.score > 0)
			.map(|entry| (entry.index as usize, entry.score))
			.collect();
		ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
		ranked.truncate(limit);

		ranked
			.into_iter()
			.map(|(index, _)| self.items[index].clone())
			.collect()
	}
}
