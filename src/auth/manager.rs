//! Bearer token lifecycle: lazy `client_credentials` exchange with a singleflight guard.
//!
//! [`TokenManager::valid_token`] answers from the cached token while `now < expires_at` and
//! only contacts the token endpoint when the cache is empty or expired. The
//! check-then-exchange-then-store sequence runs under an async mutex so concurrent callers
//! that notice expiry at the same time share one exchange instead of stampeding the endpoint;
//! waiters re-check the cache after acquiring the guard. Exchange failures are never retried
//! here: bad credentials stay bad.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// crates.io
use http::header::{ACCEPT, CONTENT_TYPE};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credentials, Secret, TokenState},
	error::{AuthenticationError, ConfigError},
	obs::{self, CallKind, CallOutcome, CallSpan},
	transport::{self, HttpTransport},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Fields the token endpoint must return; anything else is ignored.
#[derive(Deserialize)]
struct TokenGrant {
	access_token: String,
	expires_in: u64,
}

/// Owns the client credentials and the single cached bearer token.
pub struct TokenManager {
	transport: Arc<dyn HttpTransport>,
	endpoint: Url,
	credentials: Credentials,
	current: RwLock<Option<AccessToken>>,
	refresh_guard: AsyncMutex<()>,
	exchanges: AtomicU64,
}
impl TokenManager {
	/// Creates a manager in the [`TokenState::Expired`] state; no request is sent until a
	/// token is needed.
	pub fn new(transport: Arc<dyn HttpTransport>, endpoint: Url, credentials: Credentials) -> Self {
		Self {
			transport,
			endpoint,
			credentials,
			current: RwLock::new(None),
			refresh_guard: AsyncMutex::new(()),
			exchanges: AtomicU64::new(0),
		}
	}

	/// Returns a token that is valid at the moment of return, exchanging credentials when the
	/// cached one is missing or expired.
	///
	/// A token the server issues with a zero lifetime is still returned once; the next call
	/// exchanges again.
	pub async fn valid_token(&self) -> Result<AccessToken> {
		if let Some(token) = self.cached_at(OffsetDateTime::now_utc()) {
			return Ok(token);
		}

		let _singleflight = self.refresh_guard.lock().await;

		if let Some(token) = self.cached_at(OffsetDateTime::now_utc()) {
			return Ok(token);
		}

		let token = self.exchange_credentials().await?;

		*self.current.write() = Some(token.clone());

		Ok(token)
	}

	/// Performs one `client_credentials` grant without touching the cache.
	pub async fn exchange_credentials(&self) -> Result<AccessToken> {
		const KIND: CallKind = CallKind::TokenExchange;

		let span = CallSpan::new(KIND, self.endpoint.path());

		obs::record_call_outcome(KIND, CallOutcome::Attempt);
		self.exchanges.fetch_add(1, Ordering::Relaxed);

		let result = span.instrument(self.request_grant()).await;

		match &result {
			Ok(token) => obs::token_exchanged(token.expires_at),
			Err(Error::Authentication(err)) => obs::token_exchange_failed(err),
			Err(_) => {},
		}

		obs::record_call_result(KIND, &result);

		result
	}

	/// Drops the cached token so the next [`TokenManager::valid_token`] exchanges again.
	pub fn invalidate(&self) {
		self.current.write().take();
	}

	/// State of the cached token at the current instant.
	pub fn state(&self) -> TokenState {
		self.state_at(OffsetDateTime::now_utc())
	}

	/// State of the cached token at `instant`.
	pub fn state_at(&self, instant: OffsetDateTime) -> TokenState {
		match self.current.read().as_ref() {
			Some(token) => token.state_at(instant),
			None => TokenState::Expired,
		}
	}

	/// Snapshot of the cached token, expired or not.
	pub fn current_token(&self) -> Option<AccessToken> {
		self.current.read().clone()
	}

	/// Number of credential exchanges attempted so far.
	pub fn exchange_count(&self) -> u64 {
		self.exchanges.load(Ordering::Relaxed)
	}

	/// Client identifier presented to the token endpoint.
	pub fn client_id(&self) -> &str {
		self.credentials.client_id()
	}

	fn cached_at(&self, instant: OffsetDateTime) -> Option<AccessToken> {
		self.current.read().as_ref().filter(|token| token.is_valid_at(instant)).cloned()
	}

	async fn request_grant(&self) -> Result<AccessToken> {
		let request = http::Request::builder()
			.method(http::Method::POST)
			.uri(self.endpoint.as_str())
			.header(CONTENT_TYPE, FORM_CONTENT_TYPE)
			.header(ACCEPT, "application/json")
			.body(self.credentials.grant_form().into_bytes())
			.map_err(ConfigError::from)?;
		let response =
			self.transport.send(request).await.map_err(AuthenticationError::Transport)?;
		let status = response.status();

		if !status.is_success() {
			return Err(AuthenticationError::Rejected {
				status: status.as_u16(),
				body: transport::body_preview(response.body()),
			}
			.into());
		}

		let issued_at = OffsetDateTime::now_utc();
		let mut deserializer = serde_json::Deserializer::from_slice(response.body());
		let grant: TokenGrant = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| AuthenticationError::MalformedResponse {
				source,
				status: status.as_u16(),
			})?;

		if grant.access_token.is_empty() {
			return Err(AuthenticationError::EmptyAccessToken.into());
		}

		let expires_at = i64::try_from(grant.expires_in)
			.ok()
			.and_then(|secs| issued_at.checked_add(Duration::seconds(secs)))
			.ok_or(AuthenticationError::ExpiresInOutOfRange)?;

		Ok(AccessToken { secret: Secret::new(grant.access_token), issued_at, expires_at })
	}
}
impl Debug for TokenManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("endpoint", &self.endpoint.as_str())
			.field("client_id", &self.credentials.client_id())
			.field("state", &self.state())
			.finish()
	}
}
