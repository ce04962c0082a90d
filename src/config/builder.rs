// self
use crate::{
	_prelude::*,
	config::{ClientConfig, ContentTypePolicy},
	retry::RetryPolicy,
};

/// Errors raised while constructing or validating a [`ClientConfig`].
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ConfigBuildError {
	/// A URL override failed to parse.
	#[error("The {field} URL is invalid.")]
	InvalidUrl {
		/// Which URL failed validation.
		field: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoints must use HTTP(S).
	#[error("The {field} URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which URL failed validation.
		field: &'static str,
		/// URL that failed validation.
		url: String,
	},
	/// The retry budget must allow at least one attempt.
	#[error("The retry policy must allow at least one attempt.")]
	ZeroAttempts,
	/// The default page size must be positive.
	#[error("The default page limit must be at least 1.")]
	ZeroLimit,
	/// Requests need a positive timeout.
	#[error("The request timeout must be positive.")]
	ZeroTimeout,
	/// A content-type entry is blank.
	#[error("Endpoint `{endpoint}` maps to an empty content type.")]
	EmptyContentType {
		/// Endpoint whose entry is blank.
		endpoint: String,
	},
}

/// Builder for [`ClientConfig`] values; also the deserialization shape of a config.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ClientConfigBuilder {
	/// Token endpoint override; defaults to [`ClientConfig::SELLSY_AUTH_ENDPOINT`].
	pub auth_endpoint: Option<Url>,
	/// API base override; defaults to [`ClientConfig::SELLSY_API_BASE`].
	pub api_base: Option<Url>,
	/// Endpoint content-type table.
	pub content_types: ContentTypePolicy,
	/// Retry budget.
	pub retry: RetryPolicy,
	/// Default `limit` query parameter.
	pub default_limit: u32,
	/// Per-request timeout.
	pub request_timeout: StdDuration,
}
impl ClientConfigBuilder {
	/// Creates a builder seeded with the production defaults.
	pub fn new() -> Self {
		Self {
			auth_endpoint: None,
			api_base: None,
			content_types: ContentTypePolicy::sellsy(),
			retry: RetryPolicy::default(),
			default_limit: ClientConfig::DEFAULT_LIMIT,
			request_timeout: ClientConfig::DEFAULT_REQUEST_TIMEOUT,
		}
	}

	/// Sets the token endpoint.
	pub fn auth_endpoint(mut self, url: Url) -> Self {
		self.auth_endpoint = Some(url);

		self
	}

	/// Sets the API base URL; a trailing `/` is added when missing.
	pub fn api_base(mut self, url: Url) -> Self {
		self.api_base = Some(url);

		self
	}

	/// Replaces the whole content-type table.
	pub fn content_types(mut self, policy: ContentTypePolicy) -> Self {
		self.content_types = policy;

		self
	}

	/// Adds or replaces a single content-type entry.
	pub fn content_type(mut self, endpoint: impl AsRef<str>, content_type: impl Into<String>) -> Self {
		self.content_types.insert(endpoint, content_type);

		self
	}

	/// Replaces the retry policy.
	pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
		self.retry = policy;

		self
	}

	/// Overrides the attempt budget.
	pub fn max_attempts(mut self, max_attempts: u32) -> Self {
		self.retry = self.retry.with_max_attempts(max_attempts);

		self
	}

	/// Overrides the backoff unit.
	pub fn backoff_unit(mut self, unit: StdDuration) -> Self {
		self.retry = self.retry.with_backoff_unit(unit);

		self
	}

	/// Overrides the default `limit` query parameter.
	pub fn default_limit(mut self, limit: u32) -> Self {
		self.default_limit = limit;

		self
	}

	/// Overrides the per-request timeout.
	pub fn request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout = timeout;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigBuildError> {
		let auth_endpoint = match self.auth_endpoint {
			Some(url) => url,
			None => parse_default("auth", ClientConfig::SELLSY_AUTH_ENDPOINT)?,
		};
		let api_base = match self.api_base {
			Some(url) => url,
			None => parse_default("api", ClientConfig::SELLSY_API_BASE)?,
		};
		let config = ClientConfig {
			auth_endpoint,
			api_base: with_trailing_slash(api_base),
			content_types: self.content_types,
			retry: self.retry,
			default_limit: self.default_limit,
			request_timeout: self.request_timeout,
		};

		config.validate()?;

		Ok(config)
	}
}
impl Default for ClientConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}
impl TryFrom<ClientConfigBuilder> for ClientConfig {
	type Error = ConfigBuildError;

	fn try_from(builder: ClientConfigBuilder) -> Result<Self, Self::Error> {
		builder.build()
	}
}

impl ClientConfig {
	/// Validates invariants for the configuration.
	fn validate(&self) -> Result<(), ConfigBuildError> {
		validate_scheme("auth", &self.auth_endpoint)?;
		validate_scheme("api", &self.api_base)?;

		if self.retry.max_attempts == 0 {
			return Err(ConfigBuildError::ZeroAttempts);
		}
		if self.default_limit == 0 {
			return Err(ConfigBuildError::ZeroLimit);
		}
		if self.request_timeout.is_zero() {
			return Err(ConfigBuildError::ZeroTimeout);
		}
		if let Some((endpoint, _)) =
			self.content_types.iter().find(|(_, content_type)| content_type.trim().is_empty())
		{
			return Err(ConfigBuildError::EmptyContentType { endpoint: endpoint.to_owned() });
		}

		Ok(())
	}
}

fn parse_default(field: &'static str, raw: &str) -> Result<Url, ConfigBuildError> {
	Url::parse(raw).map_err(|source| ConfigBuildError::InvalidUrl { field, source })
}

fn with_trailing_slash(mut url: Url) -> Url {
	if !url.path().ends_with('/') {
		let path = format!("{}/", url.path());

		url.set_path(&path);
	}

	url
}

fn validate_scheme(field: &'static str, url: &Url) -> Result<(), ConfigBuildError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ConfigBuildError::UnsupportedScheme { field, url: url.to_string() }),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse test URL.")
	}

	#[test]
	fn api_base_gains_trailing_slash() {
		let config = ClientConfig::builder()
			.api_base(url("http://127.0.0.1:9000/v2"))
			.build()
			.expect("Configuration with a local API base should build.");

		assert_eq!(config.api_base.as_str(), "http://127.0.0.1:9000/v2/");
		assert_eq!(
			config.endpoint_url("products").expect("Endpoint should resolve.").as_str(),
			"http://127.0.0.1:9000/v2/products",
		);
	}

	#[test]
	fn rejects_invalid_values() {
		assert_eq!(
			ClientConfig::builder().max_attempts(0).build().expect_err("Zero attempts must fail."),
			ConfigBuildError::ZeroAttempts,
		);
		assert_eq!(
			ClientConfig::builder().default_limit(0).build().expect_err("Zero limit must fail."),
			ConfigBuildError::ZeroLimit,
		);
		assert_eq!(
			ClientConfig::builder()
				.request_timeout(StdDuration::ZERO)
				.build()
				.expect_err("Zero timeout must fail."),
			ConfigBuildError::ZeroTimeout,
		);
		assert_eq!(
			ClientConfig::builder()
				.content_type("uploads", " ")
				.build()
				.expect_err("Blank content type must fail."),
			ConfigBuildError::EmptyContentType { endpoint: "uploads".into() },
		);
		assert!(matches!(
			ClientConfig::builder()
				.auth_endpoint(url("ftp://login.example.com/token"))
				.build()
				.expect_err("Non-HTTP schemes must fail."),
			ConfigBuildError::UnsupportedScheme { field: "auth", .. }
		));
	}

	#[test]
	fn overrides_flow_into_the_config() {
		let config = ClientConfig::builder()
			.max_attempts(3)
			.backoff_unit(StdDuration::from_millis(5))
			.default_limit(25)
			.content_type("documents/upload", "application/octet-stream")
			.build()
			.expect("Overridden configuration should build.");

		assert_eq!(config.retry, RetryPolicy::new(3, StdDuration::from_millis(5)));
		assert_eq!(config.default_limit, 25);
		assert_eq!(config.content_types.resolve("documents/upload"), "application/octet-stream");
		assert_eq!(config.content_types.resolve("batch"), "text/plain");
	}
}
