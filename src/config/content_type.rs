// self
use crate::{_prelude::*, config::normalize_endpoint};

/// Maps endpoint paths to the `Content-Type` sent with their requests.
///
/// Endpoints without an entry use [`ContentTypePolicy::JSON`]. The body of a request is
/// JSON-serialized only when the resolved type is JSON; any other type (the `batch`
/// endpoint's `text/plain`, for instance) receives the caller's payload verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentTypePolicy(BTreeMap<String, String>);
impl ContentTypePolicy {
	/// JSON media type, also the fallback for unlisted endpoints.
	pub const JSON: &'static str = "application/json";
	/// Plain-text media type used for raw batch payloads.
	pub const TEXT: &'static str = "text/plain";

	const SELLSY_SEARCH_ENDPOINTS: [&'static str; 8] = [
		"opportunities/search",
		"individuals/search",
		"invoices/search",
		"credit-notes/search",
		"estimates/search",
		"comments/search",
		"companies/search",
		"contacts/search",
	];

	/// Creates a policy without entries; every endpoint resolves to JSON.
	pub fn empty() -> Self {
		Self(BTreeMap::new())
	}

	/// Sellsy's table: `batch` takes plain text, the search endpoints take JSON.
	pub fn sellsy() -> Self {
		Self::SELLSY_SEARCH_ENDPOINTS
			.into_iter()
			.fold(Self::empty().with("batch", Self::TEXT), |policy, endpoint| {
				policy.with(endpoint, Self::JSON)
			})
	}

	/// Adds or replaces the content type for `endpoint`.
	pub fn with(mut self, endpoint: impl AsRef<str>, content_type: impl Into<String>) -> Self {
		self.insert(endpoint, content_type);

		self
	}

	/// Adds or replaces the content type for `endpoint` in place.
	pub fn insert(&mut self, endpoint: impl AsRef<str>, content_type: impl Into<String>) {
		self.0.insert(normalize_endpoint(endpoint.as_ref()).to_owned(), content_type.into());
	}

	/// Content type for `endpoint`, falling back to [`ContentTypePolicy::JSON`].
	pub fn resolve(&self, endpoint: &str) -> &str {
		self.0.get(normalize_endpoint(endpoint)).map(String::as_str).unwrap_or(Self::JSON)
	}

	/// Returns `true` when `content_type` designates JSON, ignoring parameters and case.
	pub fn is_json(content_type: &str) -> bool {
		content_type
			.split(';')
			.next()
			.map(|essence| essence.trim().eq_ignore_ascii_case(Self::JSON))
			.unwrap_or(false)
	}

	/// Iterates over the explicit `(endpoint, content type)` entries.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(endpoint, content_type)| (endpoint.as_str(), content_type.as_str()))
	}
}
impl Default for ContentTypePolicy {
	fn default() -> Self {
		Self::sellsy()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn sellsy_table_resolves_listed_and_unlisted_endpoints() {
		let policy = ContentTypePolicy::sellsy();

		assert_eq!(policy.resolve("batch"), "text/plain");
		assert_eq!(policy.resolve("opportunities/search"), "application/json");
		assert_eq!(policy.resolve("credit-notes/search"), "application/json");
		assert_eq!(policy.resolve("products"), "application/json");
		assert_eq!(policy.iter().count(), 9);
	}

	#[test]
	fn lookups_ignore_surrounding_slashes() {
		let policy = ContentTypePolicy::empty().with("/uploads/", "application/octet-stream");

		assert_eq!(policy.resolve("uploads"), "application/octet-stream");
		assert_eq!(policy.resolve("/uploads"), "application/octet-stream");
	}

	#[test]
	fn json_detection_ignores_parameters() {
		assert!(ContentTypePolicy::is_json("application/json"));
		assert!(ContentTypePolicy::is_json("Application/JSON; charset=utf-8"));
		assert!(!ContentTypePolicy::is_json("text/plain"));
	}
}
