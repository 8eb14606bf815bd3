use reqwest::StatusCode;
use thiserror::Error;

/// Failures at the CMS boundary.
///
/// Nothing here escapes the fetch worker: lookup failures are logged and
/// mapped onto empty suggestion lists. The typed variants exist for the
/// engagement write paths and for callers that want to report precisely.
#[derive(Debug, Error)]
pub enum CmsError {
	#[error("backend request failed: {0}")]
	Transport(#[from] reqwest::Error),

	#[error("backend returned HTTP {status} during {context}")]
	Status {
		status: StatusCode,
		context: &'static str,
	},

	#[error("unexpected payload from backend: {0}")]
	Payload(String),

	#[error("no entry found for slug '{0}'")]
	MissingEntry(String),

	#[error("backend writes require an API token")]
	MissingToken,

	#[error("rating must be between 1 and 5, got {0}")]
	RatingRange(u8),
}
