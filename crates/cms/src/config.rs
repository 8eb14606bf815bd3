use std::time::Duration;

/// Timeout applied to every backend request; expiry is handled exactly like
/// any other transport failure.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

/// Connection details for one CMS collection.
#[derive(Debug, Clone)]
pub struct BackendConfig {
	base_url: String,
	collection: String,
	token: Option<String>,
	timeout: Duration,
}

impl BackendConfig {
	/// `base_url` is stored without a trailing slash so endpoint paths can
	/// be appended verbatim.
	pub fn new(base_url: impl Into<String>, collection: impl Into<String>) -> Self {
		let mut base_url = base_url.into();
		while base_url.ends_with('/') {
			base_url.pop();
		}
		Self {
			base_url,
			collection: collection.into(),
			token: None,
			timeout: DEFAULT_TIMEOUT,
		}
	}

	/// Bearer token for the authorized write paths (view counter, rating).
	#[must_use]
	pub fn with_token(mut self, token: Option<String>) -> Self {
		self.token = token.filter(|token| !token.trim().is_empty());
		self
	}

	#[must_use]
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	#[must_use]
	pub fn token(&self) -> Option<&str> {
		self.token.as_deref()
	}

	#[must_use]
	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	/// Listing endpoint of the collection.
	pub(crate) fn collection_url(&self) -> String {
		format!("{}/api/{}", self.base_url, self.collection)
	}

	/// Update endpoint for a single entry, addressed by document id.
	pub(crate) fn entry_url(&self, document_id: &str) -> String {
		format!("{}/{document_id}", self.collection_url())
	}
}
