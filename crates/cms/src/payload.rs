//! Response-shape normalization.
//!
//! Depending on the backend's schema version, listing entries arrive either
//! flat (`{ id, title, slug }`) or with their fields nested under an
//! `attributes` wrapper. Both shapes are modelled explicitly and flattened
//! into [`SuggestionItem`] values; entries without a usable title are
//! dropped rather than rendered as blank suggestions.

use receptar_suggest::SuggestionItem;
use serde::Deserialize;

/// Envelope of every collection listing response.
#[derive(Debug, Deserialize)]
pub(crate) struct Listing {
	pub(crate) data: Option<Vec<EntryPayload>>,
}

impl Listing {
	pub(crate) fn into_items(self) -> impl Iterator<Item = SuggestionItem> {
		self.data
			.unwrap_or_default()
			.into_iter()
			.filter_map(EntryPayload::normalize)
	}
}

/// A collection entry as either schema generation renders it.
///
/// `Nested` must come first: an untagged match tries variants in order, and
/// the nested shape is the only one carrying an `attributes` key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum EntryPayload {
	Nested { id: u64, attributes: EntryFields },
	Flat {
		id: u64,
		#[serde(flatten)]
		fields: EntryFields,
	},
}

#[derive(Debug, Deserialize)]
pub(crate) struct EntryFields {
	pub(crate) title: Option<String>,
	pub(crate) slug: Option<String>,
}

impl EntryPayload {
	pub(crate) fn normalize(self) -> Option<SuggestionItem> {
		let (id, fields) = match self {
			Self::Nested { id, attributes } => (id, attributes),
			Self::Flat { id, fields } => (id, fields),
		};
		let title = fields.title?;
		if title.trim().is_empty() {
			return None;
		}
		Some(SuggestionItem {
			id,
			title,
			slug: fields.slug,
		})
	}
}

/// Listing envelope for the engagement read path (`views`/`rating` fetches).
#[derive(Debug, Deserialize)]
pub(crate) struct CounterListing {
	pub(crate) data: Option<Vec<CounterEntry>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CounterEntry {
	#[serde(rename = "documentId")]
	pub(crate) document_id: String,
	#[serde(default)]
	pub(crate) views: Option<Count>,
}

/// A counter value the backend may serialize as a number or a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Count {
	Number(u64),
	Text(String),
}

impl Count {
	pub(crate) fn value(&self) -> u64 {
		match self {
			Self::Number(value) => *value,
			Self::Text(text) => text.trim().parse().unwrap_or(0),
		}
	}
}
