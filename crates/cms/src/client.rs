//! Blocking HTTP client for the collection endpoints.

use receptar_suggest::SuggestionItem;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::config::BackendConfig;
use crate::error::CmsError;
use crate::payload::{Count, CounterEntry, CounterListing, Listing};

/// Thin wrapper around a blocking `reqwest` client, scoped to one
/// collection. Cloning shares the underlying connection pool, so the fetch
/// worker and the bootstrap thread can each hold one cheaply.
#[derive(Clone)]
pub struct CmsClient {
	config: BackendConfig,
	http: Client,
}

impl CmsClient {
	pub fn new(config: BackendConfig) -> Result<Self, CmsError> {
		let http = Client::builder().timeout(config.timeout()).build()?;
		Ok(Self { config, http })
	}

	/// Case-insensitive substring lookup over titles, minimal fields only.
	pub fn suggestions(&self, text: &str, limit: usize) -> Result<Vec<SuggestionItem>, CmsError> {
		let limit_param = limit.to_string();
		let response = self
			.http
			.get(self.config.collection_url())
			.query(&[
				("filters[title][$containsi]", text),
				("pagination[limit]", limit_param.as_str()),
				("fields[0]", "id"),
				("fields[1]", "title"),
				("fields[2]", "slug"),
			])
			.send()?;
		let listing: Listing = decode(response, "suggestion lookup")?;
		Ok(listing.into_items().take(limit).collect())
	}

	/// One-time bulk listing used to seed the fuzzy index.
	pub fn bulk_listing(&self, limit: usize) -> Result<Vec<SuggestionItem>, CmsError> {
		let limit_param = limit.to_string();
		let response = self
			.http
			.get(self.config.collection_url())
			.query(&[
				("fields[0]", "id"),
				("fields[1]", "title"),
				("fields[2]", "slug"),
				("pagination[limit]", limit_param.as_str()),
			])
			.send()?;
		let listing: Listing = decode(response, "bulk listing")?;
		Ok(listing.into_items().collect())
	}

	/// Read-modify-write increment of an entry's view counter.
	///
	/// The entry is addressed by slug for the read and by its document id
	/// for the write, mirroring the backend's update route.
	pub fn bump_views(&self, slug: &str) -> Result<u64, CmsError> {
		let entry = self.entry_handle(slug, "views")?;
		let updated = entry.views.as_ref().map(Count::value).unwrap_or(0) + 1;
		self.update_entry(&entry.document_id, json!({ "data": { "views": updated } }))?;
		debug!(slug, views = updated, "view counter updated");
		Ok(updated)
	}

	/// Overwrite an entry's rating with a 1-5 value.
	pub fn submit_rating(&self, slug: &str, rating: u8) -> Result<(), CmsError> {
		if !(1..=5).contains(&rating) {
			return Err(CmsError::RatingRange(rating));
		}
		let entry = self.entry_handle(slug, "rating")?;
		self.update_entry(&entry.document_id, json!({ "data": { "rating": rating } }))?;
		debug!(slug, rating, "rating submitted");
		Ok(())
	}

	fn entry_handle(&self, slug: &str, field: &'static str) -> Result<CounterEntry, CmsError> {
		let mut request = self.http.get(self.config.collection_url()).query(&[
			("filters[slug][$eq]", slug),
			("fields[0]", field),
			("fields[1]", "documentId"),
		]);
		if let Some(token) = self.config.token() {
			request = request.bearer_auth(token);
		}
		let listing: CounterListing = decode(request.send()?, "entry fetch")?;
		listing
			.data
			.unwrap_or_default()
			.into_iter()
			.next()
			.ok_or_else(|| CmsError::MissingEntry(slug.to_string()))
	}

	fn update_entry(&self, document_id: &str, body: serde_json::Value) -> Result<(), CmsError> {
		let token = self.config.token().ok_or(CmsError::MissingToken)?;
		let response = self
			.http
			.put(self.config.entry_url(document_id))
			.bearer_auth(token)
			.json(&body)
			.send()?;
		let status = response.status();
		if !status.is_success() {
			return Err(CmsError::Status {
				status,
				context: "entry update",
			});
		}
		Ok(())
	}
}

fn decode<T: DeserializeOwned>(response: Response, context: &'static str) -> Result<T, CmsError> {
	let status = response.status();
	if !status.is_success() {
		return Err(CmsError::Status { status, context });
	}
	response.json().map_err(|err| CmsError::Payload(err.to_string()))
}
