//! Background lookup worker and index bootstrap.
//!
//! Both run on plain threads and talk to the UI loop over channels. A newer
//! lookup request supersedes an older one that has not started yet; the
//! controller's token rule remains the correctness mechanism for anything
//! already in flight.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread;

use receptar_suggest::{FuzzyIndex, LookupRequest, LookupResolution, SuggestionItem};
use tracing::{debug, warn};

use crate::client::CmsClient;
use crate::error::CmsError;

/// Spawn the suggestion fetch worker for the given client.
///
/// Returns the request sender to hand to the controller and the resolution
/// receiver to pump from the UI loop. The worker exits when the sender is
/// dropped.
pub fn spawn_fetch_worker(client: CmsClient) -> (Sender<LookupRequest>, Receiver<LookupResolution>) {
	let (request_tx, request_rx) = channel();
	let (resolution_tx, resolution_rx) = channel();
	thread::spawn(move || {
		serve_lookups(&request_rx, &resolution_tx, |text, limit| {
			client.suggestions(text, limit)
		});
	});
	(request_tx, resolution_rx)
}

/// Fetch the bulk listing off-thread and deliver the built index.
///
/// On failure the receiver simply never yields and the session stays on the
/// remote fallback for its whole lifetime.
pub fn spawn_index_bootstrap(client: CmsClient, limit: usize) -> Receiver<FuzzyIndex> {
	let (tx, rx) = channel();
	thread::spawn(move || match client.bulk_listing(limit) {
		Ok(items) => {
			let index = FuzzyIndex::new(items);
			debug!(entries = index.len(), "fuzzy index built from bulk listing");
			let _ = tx.send(index);
		}
		Err(err) => {
			warn!(error = %err, "bulk listing fetch failed; staying on remote suggestions");
		}
	});
	rx
}

fn serve_lookups(
	requests: &Receiver<LookupRequest>,
	resolutions: &Sender<LookupResolution>,
	fetch: impl Fn(&str, usize) -> Result<Vec<SuggestionItem>, CmsError>,
) {
	while let Ok(mut request) = requests.recv() {
		// Drain to the newest queued request before touching the network.
		loop {
			match requests.try_recv() {
				Ok(newer) => request = newer,
				Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
			}
		}

		let items = match fetch(request.token.text(), request.limit) {
			Ok(items) => items,
			Err(err) => {
				warn!(error = %err, query = request.token.text(), "suggestion lookup failed");
				Vec::new()
			}
		};

		let resolution = LookupResolution {
			token: request.token,
			items,
		};
		if resolutions.send(resolution).is_err() {
			return;
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use receptar_suggest::QueryToken;
	use reqwest::StatusCode;

	use super::*;

	fn request(id: u64, text: &str) -> LookupRequest {
		LookupRequest {
			token: QueryToken::new(id, text),
			limit: 5,
		}
	}

	#[test]
	fn queued_requests_collapse_to_the_newest() {
		let (request_tx, request_rx) = channel();
		let (resolution_tx, resolution_rx) = channel();

		request_tx.send(request(1, "a")).unwrap();
		request_tx.send(request(2, "ab")).unwrap();
		request_tx.send(request(3, "abc")).unwrap();
		drop(request_tx);

		let fetched = RefCell::new(Vec::new());
		serve_lookups(&request_rx, &resolution_tx, |text, _limit| {
			fetched.borrow_mut().push(text.to_string());
			Ok(vec![SuggestionItem::new(1, text)])
		});

		assert_eq!(*fetched.borrow(), vec!["abc"]);
		let resolution = resolution_rx.try_recv().unwrap();
		assert_eq!(resolution.token.id(), 3);
		assert!(resolution_rx.try_recv().is_err());
	}

	#[test]
	fn fetch_failures_resolve_as_empty_lists() {
		let (request_tx, request_rx) = channel();
		let (resolution_tx, resolution_rx) = channel();

		request_tx.send(request(1, "xyz123")).unwrap();
		drop(request_tx);

		serve_lookups(&request_rx, &resolution_tx, |_text, _limit| {
			Err(CmsError::Status {
				status: StatusCode::INTERNAL_SERVER_ERROR,
				context: "suggestion lookup",
			})
		});

		let resolution = resolution_rx.try_recv().unwrap();
		assert_eq!(resolution.token.text(), "xyz123");
		assert!(resolution.items.is_empty());
	}

	#[test]
	fn results_pass_through_with_their_token() {
		let (request_tx, request_rx) = channel();
		let (resolution_tx, resolution_rx) = channel();

		request_tx.send(request(9, "lecso")).unwrap();
		drop(request_tx);

		serve_lookups(&request_rx, &resolution_tx, |text, limit| {
			assert_eq!(limit, 5);
			Ok(vec![SuggestionItem::new(4, format!("{text} fozelek"))])
		});

		let resolution = resolution_rx.try_recv().unwrap();
		assert_eq!(resolution.token.id(), 9);
		assert_eq!(resolution.items[0].title, "lecso fozelek");
	}
}
