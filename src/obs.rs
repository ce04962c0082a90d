//! Optional observability helpers for API calls and token exchanges.
//!
//! # Feature Flags
//!
//! - `tracing` (default) wraps every call in a `sellsy_api.call` span carrying the `call` kind and
//!   the `endpoint`, and emits structured events for retries, exhaustion, cancellation, and
//!   token exchanges. Secrets never appear in fields.
//! - `metrics` increments the `sellsy_api_call_total` counter for every attempt/success/failure/
//!   cancellation, labeled by `call` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Call kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// `client_credentials` exchange against the token endpoint.
	TokenExchange,
	/// API `GET` call.
	Get,
	/// API `POST` call.
	Post,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::TokenExchange => "token_exchange",
			CallKind::Get => "get",
			CallKind::Post => "post",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Caller cancelled the operation.
	Cancelled,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
			CallOutcome::Cancelled => "cancelled",
		}
	}

	/// Classifies a finished operation.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => CallOutcome::Success,
			Err(err) if err.is_cancelled() => CallOutcome::Cancelled,
			Err(_) => CallOutcome::Failure,
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
