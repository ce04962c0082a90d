//! Shared fixtures for integration tests: a scripted transport and configuration helpers.

#![allow(dead_code)]

// std
use std::{collections::VecDeque, sync::Arc, time::Duration};
// crates.io
use parking_lot::Mutex;
use tokio::time::Instant;
// self
use sellsy_api::{
	auth::Credentials,
	config::ClientConfig,
	error::TransportError,
	transport::{HttpRequest, HttpResponse, HttpTransport, TransportFuture},
	url::Url,
};

pub const TOKEN_URL: &str = "https://login.sellsy.test/oauth2/access-tokens";
pub const API_BASE: &str = "https://api.sellsy.test/v2/";
pub const CLIENT_ID: &str = "client-it";
pub const CLIENT_SECRET: &str = "secret-it";

/// Canned outcome for one request.
#[derive(Clone, Debug)]
pub enum Reply {
	/// Respond with a status and body.
	Respond(u16, String),
	/// Fail with a network error.
	NetworkError,
	/// Never resolve.
	Hang,
}
impl Reply {
	pub fn ok(body: &str) -> Self {
		Self::Respond(200, body.to_owned())
	}

	pub fn status(status: u16, body: &str) -> Self {
		Self::Respond(status, body.to_owned())
	}

	pub fn token(access_token: &str, expires_in: i64) -> Self {
		Self::ok(&format!(r#"{{"access_token":"{access_token}","expires_in":{expires_in}}}"#))
	}
}

/// Request observed by [`ScriptedTransport`].
#[derive(Clone, Debug)]
pub struct Recorded {
	pub method: String,
	pub url: Url,
	pub authorization: Option<String>,
	pub content_type: Option<String>,
	pub body: Vec<u8>,
	pub at: Instant,
}
impl Recorded {
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	pub fn query(&self, key: &str) -> Option<String> {
		self.url.query_pairs().find(|(k, _)| k == key).map(|(_, v)| v.into_owned())
	}
}

/// Fake transport that routes token requests and API requests to separate reply queues.
///
/// Once a queue is drained, token requests receive a one-hour token and API requests receive
/// a `503`.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
	token_replies: Mutex<VecDeque<Reply>>,
	api_replies: Mutex<VecDeque<Reply>>,
	token_requests: Mutex<Vec<Recorded>>,
	api_requests: Mutex<Vec<Recorded>>,
}
impl ScriptedTransport {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn push_token(&self, reply: Reply) -> &Self {
		self.token_replies.lock().push_back(reply);

		self
	}

	pub fn push_api(&self, reply: Reply) -> &Self {
		self.api_replies.lock().push_back(reply);

		self
	}

	pub fn token_requests(&self) -> Vec<Recorded> {
		self.token_requests.lock().clone()
	}

	pub fn api_requests(&self) -> Vec<Recorded> {
		self.api_requests.lock().clone()
	}

	/// Gaps between consecutive API requests.
	pub fn api_gaps(&self) -> Vec<Duration> {
		self.api_requests.lock().windows(2).map(|pair| pair[1].at - pair[0].at).collect()
	}
}
impl HttpTransport for ScriptedTransport {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		let header = |name: http::header::HeaderName| {
			request.headers().get(name).and_then(|value| value.to_str().ok()).map(str::to_owned)
		};
		let recorded = Recorded {
			method: request.method().to_string(),
			url: Url::parse(&request.uri().to_string()).expect("Request URI should be absolute."),
			authorization: header(http::header::AUTHORIZATION),
			content_type: header(http::header::CONTENT_TYPE),
			body: request.body().clone(),
			at: Instant::now(),
		};
		let reply = if recorded.url.as_str().starts_with(TOKEN_URL) {
			self.token_requests.lock().push(recorded);
			self.token_replies.lock().pop_front().unwrap_or_else(|| Reply::token("default", 3600))
		} else {
			self.api_requests.lock().push(recorded);
			self.api_replies.lock().pop_front().unwrap_or_else(|| Reply::status(503, "busy"))
		};

		Box::pin(async move {
			match reply {
				Reply::Respond(status, body) => {
					let mut response = HttpResponse::new(body.into_bytes());

					*response.status_mut() = http::StatusCode::from_u16(status)
						.expect("Scripted status code should be valid.");

					Ok(response)
				},
				Reply::NetworkError =>
					Err(TransportError::network(std::io::Error::other("connection reset"))),
				Reply::Hang => std::future::pending().await,
			}
		})
	}
}

pub fn config(max_attempts: u32) -> ClientConfig {
	ClientConfig::builder()
		.auth_endpoint(Url::parse(TOKEN_URL).expect("Token URL fixture should parse."))
		.api_base(Url::parse(API_BASE).expect("API base fixture should parse."))
		.max_attempts(max_attempts)
		.build()
		.expect("Test configuration should build.")
}

pub fn credentials() -> Credentials {
	Credentials::new(CLIENT_ID, CLIENT_SECRET).expect("Credential fixture should be valid.")
}
