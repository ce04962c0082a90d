// self
use crate::{
	_prelude::*,
	obs::{CallKind, CallOutcome},
};

const CALL_COUNTER: &str = "sellsy_api_call_total";

/// Increments `sellsy_api_call_total{call, outcome}` when the `metrics` feature is enabled.
pub fn record_call_outcome(kind: CallKind, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(CALL_COUNTER, "call" => kind.as_str(), "outcome" => outcome.as_str())
		.increment(1);
	#[cfg(not(feature = "metrics"))]
	let _ = (CALL_COUNTER, kind, outcome);
}

/// Classifies a finished call, records it, and hands the outcome back for local bookkeeping.
pub fn record_call_result<T>(kind: CallKind, result: &Result<T>) -> CallOutcome {
	let outcome = CallOutcome::of(result);

	record_call_outcome(kind, outcome);

	outcome
}
