mod common;

// std
use std::time::Duration;
// self
use common::{Reply, ScriptedTransport};
use sellsy_api::{ApiRequest, CancellationToken, SellsyClient, error::Error};

async fn connect(transport: &std::sync::Arc<ScriptedTransport>) -> SellsyClient {
	SellsyClient::with_transport(common::config(5), common::credentials(), transport.clone())
		.await
		.expect("Client should connect with the default scripted token.")
}

#[tokio::test(start_paused = true)]
async fn cancel_during_backoff_stops_further_attempts() {
	let transport = ScriptedTransport::new();
	let client = connect(&transport).await;
	let cancel = CancellationToken::new();
	let request = ApiRequest::get("companies").cancel_on(cancel.clone());
	let (result, ()) = tokio::join!(client.execute(request), async {
		// First backoff ends at 2s, second at 6s; cancel inside the second one.
		tokio::time::sleep(Duration::from_secs(3)).await;
		cancel.cancel();
	});

	match result.expect_err("Cancellation should abort the call.") {
		Error::Cancelled { endpoint, attempts } => {
			assert_eq!(endpoint, "companies");
			assert_eq!(attempts, 2);
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	tokio::time::sleep(Duration::from_secs(60)).await;

	assert_eq!(transport.api_requests().len(), 2);
	assert_eq!(client.metrics().cancellations(), 1);
	assert_eq!(client.metrics().failures(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancelled_token_prevents_the_first_attempt() {
	let transport = ScriptedTransport::new();
	let client = connect(&transport).await;
	let cancel = CancellationToken::new();

	cancel.cancel();

	let err = client
		.execute(ApiRequest::get("companies").cancel_on(cancel))
		.await
		.expect_err("A pre-cancelled call should not run.");

	assert!(matches!(err, Error::Cancelled { attempts: 0, .. }));
	assert!(transport.api_requests().is_empty());
	assert_eq!(transport.token_requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancel_interrupts_an_in_flight_attempt() {
	let transport = ScriptedTransport::new();

	transport.push_api(Reply::Hang);

	let client = connect(&transport).await;
	let cancel = CancellationToken::new();
	let request = ApiRequest::post("companies/search").cancel_on(cancel.clone());
	let (result, ()) = tokio::join!(client.execute(request), async {
		tokio::time::sleep(Duration::from_secs(1)).await;
		cancel.cancel();
	});

	assert!(matches!(result, Err(Error::Cancelled { attempts: 1, .. })));
	assert_eq!(transport.api_requests().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn uncancelled_token_does_not_interfere() {
	let transport = ScriptedTransport::new();

	transport.push_api(Reply::status(500, "once")).push_api(Reply::ok(r#"{"ok":true}"#));

	let client = connect(&transport).await;
	let body = client
		.execute(ApiRequest::get("companies").cancel_on(CancellationToken::new()))
		.await
		.expect("The retry should succeed when nobody cancels.");

	assert_eq!(body["ok"], true);
	assert_eq!(client.metrics().cancellations(), 0);
}
