//! Per-call request description: method, endpoint, query, body, response mode, cancellation.

// self
use crate::{_prelude::*, config::ContentTypePolicy, obs::CallKind};

/// Query parameters attached to a call. Owned per call; never shared between calls.
pub type QueryParams = BTreeMap<String, String>;

/// HTTP methods exposed by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiMethod {
	/// Read (usually paginated) resources.
	Get,
	/// Create resources, run searches, or submit batches.
	Post,
}
impl ApiMethod {
	/// Converts into the [`http::Method`] sent on the wire.
	pub fn as_http(self) -> http::Method {
		match self {
			ApiMethod::Get => http::Method::GET,
			ApiMethod::Post => http::Method::POST,
		}
	}

	/// Observability label for calls using this method.
	pub fn call_kind(self) -> CallKind {
		match self {
			ApiMethod::Get => CallKind::Get,
			ApiMethod::Post => CallKind::Post,
		}
	}
}

/// Request payload.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
	/// Structured payload; serialized as JSON text for JSON endpoints.
	Json(Value),
	/// Pre-rendered text (e.g. a batch script) sent verbatim.
	Raw(String),
}
impl RequestBody {
	/// Renders the payload for an endpoint expecting `content_type`.
	///
	/// [`RequestBody::Raw`] is never re-encoded. A [`RequestBody::Json`] string headed for a
	/// non-JSON endpoint is sent without quotes; any other JSON value is sent as JSON text.
	pub fn encode(&self, content_type: &str) -> Vec<u8> {
		match self {
			RequestBody::Raw(text) => text.clone().into_bytes(),
			RequestBody::Json(Value::String(text)) if !ContentTypePolicy::is_json(content_type) =>
				text.clone().into_bytes(),
			RequestBody::Json(value) => value.to_string().into_bytes(),
		}
	}
}
impl From<Value> for RequestBody {
	fn from(value: Value) -> Self {
		Self::Json(value)
	}
}
impl From<String> for RequestBody {
	fn from(text: String) -> Self {
		Self::Raw(text)
	}
}
impl From<&str> for RequestBody {
	fn from(text: &str) -> Self {
		Self::Raw(text.to_owned())
	}
}

/// Shape of the value returned for a successful call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResponseMode {
	/// The parsed body as returned by the API, including `pagination` metadata.
	#[default]
	Envelope,
	/// Only the `data` member of the envelope; an empty array when it is absent.
	Data,
}
impl ResponseMode {
	/// Applies the mode to a parsed response body.
	///
	/// In [`ResponseMode::Data`] an object without `data` and an empty body (`null`) both
	/// yield `[]`. A body that is not an envelope at all (a top-level array or scalar) is
	/// returned unchanged.
	pub fn select(self, body: Value) -> Value {
		match (self, body) {
			(ResponseMode::Envelope, body) => body,
			(ResponseMode::Data, Value::Object(mut envelope)) =>
				envelope.remove("data").unwrap_or_else(|| Value::Array(Vec::new())),
			(ResponseMode::Data, Value::Null) => Value::Array(Vec::new()),
			(ResponseMode::Data, body) => body,
		}
	}
}

/// Single logical API call.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: ApiMethod,
	/// Endpoint path relative to the API base, e.g. `companies/search`.
	pub endpoint: String,
	/// Caller-supplied query parameters.
	pub params: QueryParams,
	/// Optional payload.
	pub body: Option<RequestBody>,
	/// Envelope or data-only response.
	pub mode: ResponseMode,
	/// Signal that abandons the call, including during backoff sleeps.
	pub cancellation: Option<CancellationToken>,
}
impl ApiRequest {
	/// Query parameter carrying the page size.
	pub const LIMIT_PARAM: &'static str = "limit";

	/// Creates a request for `endpoint` with no parameters or body.
	pub fn new(method: ApiMethod, endpoint: impl Into<String>) -> Self {
		Self {
			method,
			endpoint: endpoint.into(),
			params: QueryParams::new(),
			body: None,
			mode: ResponseMode::default(),
			cancellation: None,
		}
	}

	/// Creates a `GET` request.
	pub fn get(endpoint: impl Into<String>) -> Self {
		Self::new(ApiMethod::Get, endpoint)
	}

	/// Creates a `POST` request.
	pub fn post(endpoint: impl Into<String>) -> Self {
		Self::new(ApiMethod::Post, endpoint)
	}

	/// Adds or replaces one query parameter.
	pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.params.insert(key.into(), value.to_string());

		self
	}

	/// Adds or replaces several query parameters.
	pub fn params<I, K, V>(mut self, params: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: ToString,
	{
		for (key, value) in params.into_iter() {
			self.params.insert(key.into(), value.to_string());
		}

		self
	}

	/// Sets the payload.
	pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Overrides the response mode.
	pub fn response_mode(mut self, mode: ResponseMode) -> Self {
		self.mode = mode;

		self
	}

	/// Returns only the `data` member of the response envelope.
	pub fn data_only(self) -> Self {
		self.response_mode(ResponseMode::Data)
	}

	/// Abandons the call once `token` is cancelled.
	pub fn cancel_on(mut self, token: CancellationToken) -> Self {
		self.cancellation = Some(token);

		self
	}

	/// Caller parameters plus `limit=default_limit` when the caller did not pass a limit.
	pub fn effective_params(&self, default_limit: u32) -> QueryParams {
		let mut params = self.params.clone();

		params.entry(Self::LIMIT_PARAM.to_owned()).or_insert_with(|| default_limit.to_string());

		params
	}

	/// Wire body for an endpoint expecting `content_type`.
	///
	/// A `POST` without a payload sends `{}` to JSON endpoints and nothing otherwise; a `GET`
	/// never carries a payload.
	pub fn encoded_body(&self, content_type: &str) -> Vec<u8> {
		match (&self.body, self.method) {
			(_, ApiMethod::Get) => Vec::new(),
			(Some(body), ApiMethod::Post) => body.encode(content_type),
			(None, ApiMethod::Post) if ContentTypePolicy::is_json(content_type) => b"{}".to_vec(),
			(None, ApiMethod::Post) => Vec::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn default_limit_only_fills_gaps() {
		let implicit = ApiRequest::get("companies");
		let explicit = ApiRequest::get("companies").param("limit", 25).param("offset", 50);

		assert_eq!(implicit.effective_params(100).get("limit").map(String::as_str), Some("100"));
		assert_eq!(explicit.effective_params(100).get("limit").map(String::as_str), Some("25"));
		assert_eq!(explicit.effective_params(100).get("offset").map(String::as_str), Some("50"));
		assert!(implicit.params.is_empty(), "Defaults must not leak into the caller's params.");
	}

	#[test]
	fn bodies_follow_the_content_type() {
		let search = json!({ "filters": { "name": "acme" } });

		assert_eq!(
			RequestBody::from(search.clone()).encode(ContentTypePolicy::JSON),
			br#"{"filters":{"name":"acme"}}"#.to_vec(),
		);
		assert_eq!(
			RequestBody::from("GET /companies\n").encode(ContentTypePolicy::TEXT),
			b"GET /companies\n".to_vec(),
		);
		assert_eq!(
			RequestBody::Json(json!("GET /companies")).encode(ContentTypePolicy::TEXT),
			b"GET /companies".to_vec(),
		);
		assert_eq!(
			RequestBody::Json(json!("quoted")).encode(ContentTypePolicy::JSON),
			b"\"quoted\"".to_vec(),
		);
	}

	#[test]
	fn missing_bodies_depend_on_method_and_content_type() {
		assert_eq!(ApiRequest::post("companies").encoded_body(ContentTypePolicy::JSON), b"{}");
		assert!(ApiRequest::post("batch").encoded_body(ContentTypePolicy::TEXT).is_empty());
		assert!(
			ApiRequest::get("companies")
				.body(json!({ "ignored": true }))
				.encoded_body(ContentTypePolicy::JSON)
				.is_empty()
		);
	}

	#[test]
	fn data_mode_extracts_the_slice() {
		let envelope = json!({ "data": [{ "id": 1 }], "pagination": { "offset": 0, "total": 1 } });

		assert_eq!(ResponseMode::Envelope.select(envelope.clone()), envelope);
		assert_eq!(ResponseMode::Data.select(envelope), json!([{ "id": 1 }]));
		assert_eq!(ResponseMode::Data.select(json!({ "pagination": {} })), json!([]));
		assert_eq!(ResponseMode::Data.select(Value::Null), json!([]));
		assert_eq!(ResponseMode::Data.select(json!([{ "id": 2 }])), json!([{ "id": 2 }]));
		assert_eq!(ResponseMode::Data.select(json!("accepted")), json!("accepted"));
	}
}
