//! Client configuration: API endpoints, content negotiation, retry budget, and paging defaults.
//!
//! [`ClientConfig`] is immutable once built. Use [`ClientConfig::sellsy`] for the production
//! endpoints or [`ClientConfig::builder`] to override individual settings (tests typically
//! point both URLs at a mock server and shrink the backoff unit).

/// Builder API for assembling client configurations.
pub mod builder;
/// Endpoint to content-type mapping.
pub mod content_type;

pub use builder::*;
pub use content_type::*;

// self
use crate::{_prelude::*, error::ConfigError, retry::RetryPolicy};

/// Immutable configuration consumed by [`SellsyClient`](crate::SellsyClient).
///
/// Deserialization goes through [`ClientConfigBuilder`], so omitted fields take the
/// production defaults and the result is normalized and validated like a built value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ClientConfigBuilder")]
pub struct ClientConfig {
	/// OAuth 2.0 token endpoint used for the `client_credentials` grant.
	pub auth_endpoint: Url,
	/// Base URL every endpoint path is resolved against; always ends with `/`.
	pub api_base: Url,
	/// Content type selected per endpoint.
	pub content_types: ContentTypePolicy,
	/// Retry budget applied to every API call.
	pub retry: RetryPolicy,
	/// `limit` query parameter added when the caller does not supply one.
	pub default_limit: u32,
	/// Per-request timeout applied to the default HTTP client.
	pub request_timeout: StdDuration,
}
impl ClientConfig {
	/// Production token endpoint.
	pub const SELLSY_AUTH_ENDPOINT: &'static str = "https://login.sellsy.com/oauth2/access-tokens";
	/// Production API base.
	pub const SELLSY_API_BASE: &'static str = "https://api.sellsy.com/v2/";
	/// Page size requested when the caller does not pass `limit`.
	pub const DEFAULT_LIMIT: u32 = 100;
	/// Per-request timeout used when not configured.
	pub const DEFAULT_REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);

	/// Creates a builder seeded with the production defaults.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::new()
	}

	/// Production configuration with default retry, paging, and content-type settings.
	pub fn sellsy() -> Result<Self, ConfigBuildError> {
		Self::builder().build()
	}

	/// Resolves `endpoint` (e.g. `companies/search`) against [`ClientConfig::api_base`].
	///
	/// Absolute URLs and paths escaping the base are rejected so the bearer token never
	/// leaves the configured API host.
	pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, ConfigError> {
		let path = normalize_endpoint(endpoint);
		let url = self
			.api_base
			.join(path)
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: endpoint.into(), source })?;

		if url.as_str().starts_with(self.api_base.as_str()) {
			Ok(url)
		} else {
			Err(ConfigError::EndpointOutsideBase { endpoint: endpoint.into() })
		}
	}
}

/// Strips surrounding slashes so `"/companies/"` and `"companies"` address the same endpoint.
pub(crate) fn normalize_endpoint(endpoint: &str) -> &str {
	endpoint.trim().trim_matches('/')
}
