//! Request execution: URL and header construction, content negotiation, and bounded retries.
//!
//! [`RequestExecutor::execute`] builds the HTTP request and sends it up to
//! [`RetryPolicy::attempts`] times, asking the [`TokenManager`] for a valid token before each
//! attempt so a token that expires during a backoff sleep is refreshed. A 2xx response
//! whose body parses as JSON ends the call; network errors, timeouts, non-2xx statuses, and
//! malformed bodies are retried after an exponential backoff. When the budget runs out the
//! last failure is wrapped into [`Error::RequestExhausted`]. An attached
//! [`CancellationToken`] is honored before the first attempt, while an attempt is in flight,
//! and during every backoff sleep.
//!
//! [`RetryPolicy::attempts`]: crate::retry::RetryPolicy::attempts

mod metrics;
mod request;

pub use metrics::RequestMetrics;
pub use request::*;

// crates.io
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	auth::TokenManager,
	config::ClientConfig,
	error::{ConfigError, TransientError},
	obs::{self, CallOutcome, CallSpan},
	transport::{self, HttpRequest, HttpResponse, HttpTransport},
};

/// Executes API calls with bearer authentication and retries.
#[derive(Clone)]
pub struct RequestExecutor {
	transport: Arc<dyn HttpTransport>,
	tokens: Arc<TokenManager>,
	config: Arc<ClientConfig>,
	metrics: Arc<RequestMetrics>,
}
impl RequestExecutor {
	/// Creates an executor sharing `transport` and `tokens` with the rest of the client.
	pub fn new(
		transport: Arc<dyn HttpTransport>,
		tokens: Arc<TokenManager>,
		config: Arc<ClientConfig>,
	) -> Self {
		Self { transport, tokens, config, metrics: Default::default() }
	}

	/// Counters for calls issued through this executor.
	pub fn metrics(&self) -> &RequestMetrics {
		&self.metrics
	}

	/// Runs `request` to completion, returning the parsed JSON body shaped by its
	/// [`ResponseMode`].
	pub async fn execute(&self, request: &ApiRequest) -> Result<Value> {
		let kind = request.method.call_kind();
		let span = CallSpan::new(kind, &request.endpoint);

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = span.instrument(self.run(request)).await;

		match obs::record_call_result(kind, &result) {
			CallOutcome::Success => self.metrics.record_success(),
			CallOutcome::Cancelled => self.metrics.record_cancelled(),
			_ => self.metrics.record_failure(),
		}

		result
	}

	async fn run(&self, request: &ApiRequest) -> Result<Value> {
		let endpoint = request.endpoint.as_str();
		let cancellation = request.cancellation.as_ref();
		let max_attempts = self.config.retry.attempts();
		let url = self.request_url(request)?;
		let content_type = self.config.content_types.resolve(endpoint);
		let body = request.encoded_body(content_type);
		let mut attempt = 0;

		loop {
			// Re-checked per attempt so a token that expired during the last backoff is replaced.
			let token = match until_cancelled(cancellation, self.tokens.valid_token()).await {
				Some(token) => token?,
				None => return Err(cancelled(endpoint, attempt)),
			};

			attempt += 1;

			let http_request = http::Request::builder()
				.method(request.method.as_http())
				.uri(url.as_str())
				.header(AUTHORIZATION, token.authorization_header())
				.header(CONTENT_TYPE, content_type)
				.header(ACCEPT, "application/json")
				.body(body.clone())
				.map_err(ConfigError::from)?;

			self.metrics.record_attempt();

			let failure = match until_cancelled(cancellation, self.send(http_request)).await {
				Some(Ok(value)) => return Ok(request.mode.select(value)),
				Some(Err(failure)) => failure,
				None => return Err(cancelled(endpoint, attempt)),
			};

			if attempt >= max_attempts {
				obs::request_exhausted(endpoint, attempt, &failure);

				return Err(Error::RequestExhausted {
					endpoint: endpoint.to_owned(),
					attempts: attempt,
					last: failure,
				});
			}

			let delay = self.config.retry.backoff(attempt);

			obs::attempt_failed(endpoint, attempt, max_attempts, delay, &failure);
			self.metrics.record_retry();

			if until_cancelled(cancellation, tokio::time::sleep(delay)).await.is_none() {
				return Err(cancelled(endpoint, attempt));
			}
		}
	}

	async fn send(&self, request: HttpRequest) -> Result<Value, TransientError> {
		let response = self.transport.send(request).await?;

		parse_response(&response)
	}

	fn request_url(&self, request: &ApiRequest) -> Result<Url> {
		let mut url = self.config.endpoint_url(&request.endpoint)?;

		url.query_pairs_mut().extend_pairs(request.effective_params(self.config.default_limit));

		Ok(url)
	}
}
impl Debug for RequestExecutor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestExecutor")
			.field("api_base", &self.config.api_base.as_str())
			.field("retry", &self.config.retry)
			.field("metrics", &self.metrics)
			.finish()
	}
}

/// Classifies a single attempt's response.
fn parse_response(response: &HttpResponse) -> Result<Value, TransientError> {
	let status = response.status();
	let body = response.body();

	if !status.is_success() {
		return Err(TransientError::Status {
			status: status.as_u16(),
			body: transport::body_preview(body),
		});
	}
	if body.iter().all(u8::is_ascii_whitespace) {
		return Ok(Value::Null);
	}

	serde_json::from_slice(body)
		.map_err(|source| TransientError::MalformedBody { source, status: status.as_u16() })
}

/// Drives `fut` unless `cancellation` fires first; `None` means the call was cancelled.
async fn until_cancelled<F>(cancellation: Option<&CancellationToken>, fut: F) -> Option<F::Output>
where
	F: Future,
{
	match cancellation {
		Some(token) => tokio::select! {
			biased;
			_ = token.cancelled() => None,
			output = fut => Some(output),
		},
		None => Some(fut.await),
	}
}

fn cancelled(endpoint: &str, attempts: u32) -> Error {
	obs::call_cancelled(endpoint, attempts);

	Error::Cancelled { endpoint: endpoint.to_owned(), attempts }
}
