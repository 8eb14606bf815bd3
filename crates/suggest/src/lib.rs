//! Suggestion engine primitives for `receptar`.
//!
//! UI-free core of the typeahead search: the debounced [`QueryController`]
//! state machine, the diacritic-tolerant [`FuzzyIndex`], and the message
//! types that connect the controller to a background fetch worker.

mod controller;
mod fuzzy;
mod types;

pub use controller::{
	DEFAULT_DEBOUNCE, DEFAULT_SUGGESTION_LIMIT, Direction, LookupRequest, LookupResolution,
	QueryController,
};
pub use fuzzy::FuzzyIndex;
pub use types::{Navigation, QueryToken, SearchOutcome, SuggestionItem};
