//! Bounded retry budget with exponential backoff.

// self
use crate::_prelude::*;

/// Retry budget applied to every API call.
///
/// The delay inserted after the `n`-th failed attempt is `backoff_unit × 2^n`, so a call that
/// fails four times waits 2, 4, 8 and 16 units before its fifth and last attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
	/// Total number of HTTP attempts per call, including the first one.
	pub max_attempts: u32,
	/// Time unit scaled by `2^attempt` between attempts.
	pub backoff_unit: StdDuration,
}
impl RetryPolicy {
	/// Attempts per call when not configured.
	pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
	/// Backoff unit when not configured.
	pub const DEFAULT_BACKOFF_UNIT: StdDuration = StdDuration::from_secs(1);

	/// Creates a policy with explicit values.
	pub fn new(max_attempts: u32, backoff_unit: StdDuration) -> Self {
		Self { max_attempts, backoff_unit }
	}

	/// Overrides the attempt budget.
	pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
		self.max_attempts = max_attempts;

		self
	}

	/// Overrides the backoff unit.
	pub fn with_backoff_unit(mut self, unit: StdDuration) -> Self {
		self.backoff_unit = unit;

		self
	}

	/// Effective attempt budget; a zero budget still performs one attempt.
	pub fn attempts(&self) -> u32 {
		self.max_attempts.max(1)
	}

	/// Delay to wait after `failed_attempt` (1-based) before the next attempt.
	pub fn backoff(&self, failed_attempt: u32) -> StdDuration {
		2_u32
			.checked_pow(failed_attempt)
			.and_then(|factor| self.backoff_unit.checked_mul(factor))
			.unwrap_or(StdDuration::MAX)
	}

	/// Every delay a call may sleep through when all of its attempts fail but the last.
	pub fn delays(&self) -> impl Iterator<Item = StdDuration> + '_ {
		(1..self.attempts()).map(|attempt| self.backoff(attempt))
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_BACKOFF_UNIT)
	}
}
