//! Connects to a mock Sellsy API, lists companies in data mode, and submits a batch script.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use sellsy_api::{
	ApiRequest, QueryParams, RequestBody, SellsyClient, auth::Credentials, config::ClientConfig,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/access-tokens");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":3600}");
		})
		.await;
	let companies_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/companies").query_param("limit", "100");
			then.status(200).json_body(json!({
				"data": [{ "id": 1, "name": "Acme" }, { "id": 2, "name": "Globex" }],
				"pagination": { "limit": 100, "count": 2, "total": 2, "offset": "WzJd" },
			}));
		})
		.await;
	let batch_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/v2/batch").header("content-type", "text/plain");
			then.status(200).json_body(json!({ "status": "queued" }));
		})
		.await;
	let config = ClientConfig::builder()
		.auth_endpoint(Url::parse(&server.url("/oauth2/access-tokens"))?)
		.api_base(Url::parse(&server.url("/v2/"))?)
		.build()?;
	let client =
		SellsyClient::with_config(config, Credentials::new("demo-client", "demo-secret")?).await?;
	let companies = client.execute(ApiRequest::get("companies").data_only()).await?;

	for company in companies.as_array().into_iter().flatten() {
		println!("Company {}: {}.", company["id"], company["name"]);
	}

	let batch = client
		.post(
			"batch",
			QueryParams::new(),
			Some(RequestBody::Raw("GET /companies/1\nGET /companies/2".into())),
		)
		.await?;

	println!("Batch status: {}.", batch["status"]);
	println!("Token exchanges so far: {}.", client.tokens().exchange_count());

	token_mock.assert_async().await;
	companies_mock.assert_async().await;
	batch_mock.assert_async().await;

	Ok(())
}
