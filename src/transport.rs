//! Transport primitives shared by the token exchange and the request executor.
//!
//! [`HttpTransport`] is the client's only dependency on an HTTP stack. It accepts a fully
//! built [`HttpRequest`] and resolves to the buffered [`HttpResponse`], leaving status
//! classification, retries, and JSON decoding to the caller. [`ReqwestHttpClient`] is the
//! default implementation; tests and embedders can plug in their own.

// std
use std::ops::Deref;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Request type accepted by [`HttpTransport::send`].
pub type HttpRequest = http::Request<Vec<u8>>;
/// Buffered response returned by [`HttpTransport::send`].
pub type HttpResponse = http::Response<Vec<u8>>;
/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

const BODY_PREVIEW_LIMIT: usize = 512;

/// Abstraction over HTTP stacks capable of executing a single request.
///
/// Implementations must not retry, follow authentication challenges, or interpret the
/// status code: every non-transport outcome is returned as an [`HttpResponse`]. Timeouts
/// should be reported as [`TransportError::Timeout`] so callers can tell them apart from
/// connection failures in diagnostics.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and buffers the full response body.
	fn send(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that aborts any request running longer than `timeout`.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).build()?;

		Ok(Self(client))
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl HttpTransport for ReqwestHttpClient {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let request = reqwest::Request::try_from(request)?;
			let response = self.0.execute(request).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let mut response_new = HttpResponse::new(response.bytes().await?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok::<_, TransportError>(response_new)
		})
	}
}

/// Renders a response body for error messages, truncated to a bounded length.
pub(crate) fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);
	let trimmed = text.trim();

	match trimmed.char_indices().nth(BODY_PREVIEW_LIMIT) {
		Some((cut, _)) => format!("{}…", &trimmed[..cut]),
		None => trimmed.to_owned(),
	}
}
