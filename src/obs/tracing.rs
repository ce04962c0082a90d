// self
use crate::{
	_prelude::*,
	error::{AuthenticationError, TransientError},
	obs::CallKind,
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by client operations.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the call kind + endpoint.
	pub fn new(kind: CallKind, endpoint: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("sellsy_api.call", call = kind.as_str(), endpoint);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, endpoint);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

pub(crate) fn attempt_failed(
	endpoint: &str,
	attempt: u32,
	max_attempts: u32,
	delay: StdDuration,
	err: &TransientError,
) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			endpoint,
			attempt,
			max_attempts,
			delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
			status = err.status(),
			error = %err,
			"Attempt failed; retrying after backoff."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (endpoint, attempt, max_attempts, delay, err);
	}
}

pub(crate) fn request_exhausted(endpoint: &str, attempts: u32, err: &TransientError) {
	#[cfg(feature = "tracing")]
	{
		tracing::error!(
			endpoint,
			attempts,
			status = err.status(),
			error = %err,
			"Retry budget exhausted."
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (endpoint, attempts, err);
	}
}

pub(crate) fn call_cancelled(endpoint: &str, attempts: u32) {
	#[cfg(feature = "tracing")]
	{
		tracing::info!(endpoint, attempts, "Call cancelled by the caller.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (endpoint, attempts);
	}
}

pub(crate) fn token_exchanged(expires_at: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(%expires_at, "Exchanged client credentials for a bearer token.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = expires_at;
	}
}

pub(crate) fn token_exchange_failed(err: &AuthenticationError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(error = %err, "Client credentials exchange failed.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = err;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = CallSpan::new(CallKind::Get, "companies");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn events_accept_all_inputs() {
		let err = TransientError::Status { status: 502, body: "bad gateway".into() };

		attempt_failed("companies", 1, 5, StdDuration::from_secs(2), &err);
		request_exhausted("companies", 5, &err);
		call_cancelled("companies", 2);
		token_exchanged(OffsetDateTime::now_utc());
		token_exchange_failed(&AuthenticationError::EmptyAccessToken);
	}
}
