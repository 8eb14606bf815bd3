/// Textual configuration for the prompt and its dropdown.
#[derive(Debug, Clone)]
pub struct UiLabels {
	/// Title rendered on the prompt border.
	pub prompt_title: String,
	/// Dim text shown while the prompt is empty.
	pub placeholder: String,
	/// One-line key hint rendered beneath the dropdown.
	pub hint: String,
}

impl Default for UiLabels {
	fn default() -> Self {
		Self {
			prompt_title: "Recipe search".to_string(),
			placeholder: "Search recipes or ingredients…".to_string(),
			hint: "Type to search · Enter to open · Esc to cancel".to_string(),
		}
	}
}
