//! Client-level error types shared by the token manager, the executor, and configuration.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Credential exchange failed; never retried automatically.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),

	/// Every attempt allowed by the retry policy failed.
	#[error("All {attempts} attempts failed for `{endpoint}`: {last}")]
	RequestExhausted {
		/// Endpoint path the call targeted.
		endpoint: String,
		/// Number of HTTP attempts performed.
		attempts: u32,
		/// Failure observed on the final attempt.
		#[source]
		last: TransientError,
	},
	/// Caller abandoned the call through its cancellation token.
	#[error("Call to `{endpoint}` was cancelled after {attempts} attempt(s).")]
	Cancelled {
		/// Endpoint path the call targeted.
		endpoint: String,
		/// Number of HTTP attempts started before cancellation.
		attempts: u32,
	},
}
impl Error {
	/// Returns `true` for [`Error::Authentication`].
	pub fn is_authentication(&self) -> bool {
		matches!(self, Self::Authentication(_))
	}

	/// Returns `true` for [`Error::Cancelled`].
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled { .. })
	}
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed (invalid header value, URI, ...).
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// Endpoint path cannot be joined onto the API base URL.
	#[error("Endpoint `{endpoint}` cannot be resolved against the API base URL.")]
	InvalidEndpoint {
		/// Endpoint path supplied by the caller.
		endpoint: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint path resolves to a URL outside the API base.
	#[error("Endpoint `{endpoint}` escapes the API base URL.")]
	EndpointOutsideBase {
		/// Endpoint path supplied by the caller.
		endpoint: String,
	},
	/// Client configuration failed validation.
	#[error(transparent)]
	Build(#[from] crate::config::ConfigBuildError),
	/// Client credentials failed validation.
	#[error(transparent)]
	Credentials(#[from] crate::auth::CredentialsError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Credential exchange failures. Retrying with the same credentials will not help, so these
/// always surface to the caller.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// The token endpoint could not be reached.
	#[error("Token endpoint could not be reached.")]
	Transport(#[source] TransportError),
	/// The token endpoint answered with a non-success status.
	#[error("Token endpoint rejected the client credentials with status {status}: {body}")]
	Rejected {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Truncated response body.
		body: String,
	},
	/// The token endpoint answered with a body lacking `access_token` or `expires_in`.
	#[error("Token endpoint returned a malformed response.")]
	MalformedResponse {
		/// Structured parsing failure pointing at the offending field.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// The token endpoint returned an empty `access_token`.
	#[error("Token endpoint returned an empty access token.")]
	EmptyAccessToken,
	/// The token endpoint returned an `expires_in` value too large to represent.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}

/// Failure of a single HTTP attempt. Retried internally; surfaces only wrapped inside
/// [`Error::RequestExhausted`].
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Network failure or timeout.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Upstream answered with a non-2xx status.
	#[error("Upstream returned status {status}: {body}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Truncated response body.
		body: String,
	},
	/// Upstream answered 2xx with a body that is not JSON.
	#[error("Upstream returned malformed JSON with status {status}.")]
	MalformedBody {
		/// JSON parsing failure.
		#[source]
		source: serde_json::Error,
		/// HTTP status code.
		status: u16,
	},
}
impl TransientError {
	/// HTTP status code attached to the failure, when a response was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Transport(_) => None,
			Self::Status { status, .. } | Self::MalformedBody { status, .. } => Some(*status),
		}
	}
}

/// Transport-level failures (network, timeout).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying HTTP client gave up waiting for the response.
	#[error("Request timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Timeout { source: Box::new(src) }
	}

	/// Returns `true` for [`TransportError::Timeout`].
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout { .. })
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::timeout(e) } else { Self::network(e) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
