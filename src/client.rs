//! Public entry point tying configuration, the token manager, and the executor together.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenManager},
	config::ClientConfig,
	error::ConfigError,
	executor::{ApiRequest, QueryParams, RequestBody, RequestExecutor, RequestMetrics},
	transport::{HttpTransport, ReqwestHttpClient},
};

/// Authenticated Sellsy API client.
///
/// Construction exchanges the client credentials once, so a client that exists always held a
/// valid token at some point. Cloning is cheap and every clone shares the token cache, the
/// transport, and the counters.
#[derive(Clone, Debug)]
pub struct SellsyClient {
	config: Arc<ClientConfig>,
	tokens: Arc<TokenManager>,
	executor: RequestExecutor,
}
impl SellsyClient {
	/// Connects to the production Sellsy API with default settings.
	pub async fn connect(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Result<Self> {
		let config = ClientConfig::sellsy().map_err(ConfigError::from)?;
		let credentials = Credentials::new(client_id, client_secret).map_err(ConfigError::from)?;

		Self::with_config(config, credentials).await
	}

	/// Connects using `config` and a reqwest client honoring [`ClientConfig::request_timeout`].
	pub async fn with_config(config: ClientConfig, credentials: Credentials) -> Result<Self> {
		let transport = ReqwestHttpClient::with_timeout(config.request_timeout)?;

		Self::with_transport(config, credentials, Arc::new(transport)).await
	}

	/// Connects using a caller-supplied transport.
	///
	/// Fails with [`Error::Authentication`] when the initial credential exchange fails; no
	/// token is cached in that case.
	pub async fn with_transport(
		config: ClientConfig,
		credentials: Credentials,
		transport: Arc<dyn HttpTransport>,
	) -> Result<Self> {
		let config = Arc::new(config);
		let tokens = Arc::new(TokenManager::new(
			transport.clone(),
			config.auth_endpoint.clone(),
			credentials,
		));

		tokens.valid_token().await?;

		let executor = RequestExecutor::new(transport, tokens.clone(), config.clone());

		Ok(Self { config, tokens, executor })
	}

	/// Issues a `GET` and returns the full response envelope.
	pub async fn get(&self, endpoint: &str, params: QueryParams) -> Result<Value> {
		self.execute(ApiRequest::get(endpoint).params(params)).await
	}

	/// Issues a `GET` and returns only the `data` member of the response (empty array when
	/// absent).
	pub async fn get_data(&self, endpoint: &str, params: QueryParams) -> Result<Value> {
		self.execute(ApiRequest::get(endpoint).params(params).data_only()).await
	}

	/// Issues a `POST`; the body is encoded according to the endpoint's content type.
	pub async fn post(
		&self,
		endpoint: &str,
		params: QueryParams,
		body: Option<RequestBody>,
	) -> Result<Value> {
		let mut request = ApiRequest::post(endpoint).params(params);

		if let Some(body) = body {
			request = request.body(body);
		}

		self.execute(request).await
	}

	/// Runs a fully described request, including its response mode and cancellation token.
	pub async fn execute(&self, request: ApiRequest) -> Result<Value> {
		self.executor.execute(&request).await
	}

	/// Configuration this client was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Token manager shared by every clone of this client.
	pub fn tokens(&self) -> &TokenManager {
		&self.tokens
	}

	/// Per-client call counters.
	pub fn metrics(&self) -> &RequestMetrics {
		self.executor.metrics()
	}
}
