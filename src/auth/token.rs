//! Bearer token record and its validity state.

// self
use crate::{_prelude::*, auth::Secret};

/// Lifecycle state of the cached bearer token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenState {
	/// Token is present and `now < expires_at`.
	Valid,
	/// Token is absent or `now >= expires_at`.
	Expired,
}
impl TokenState {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenState::Valid => "valid",
			TokenState::Expired => "expired",
		}
	}
}
impl Display for TokenState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Immutable bearer token issued by the token endpoint.
///
/// A refresh replaces the whole record; `expires_at` is always `issued_at` plus the lifetime
/// reported by the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
	/// Token value presented in the `Authorization` header.
	pub secret: Secret,
	/// Instant at which the exchange response was received.
	pub issued_at: OffsetDateTime,
	/// Instant from which the token must no longer be used.
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Builds a token issued at `issued_at` and valid for `lifetime`.
	pub fn new(secret: impl Into<String>, issued_at: OffsetDateTime, lifetime: Duration) -> Self {
		Self { secret: Secret::new(secret), issued_at, expires_at: issued_at + lifetime }
	}

	/// Computes the state at a given instant.
	pub fn state_at(&self, instant: OffsetDateTime) -> TokenState {
		if instant < self.expires_at { TokenState::Valid } else { TokenState::Expired }
	}

	/// Returns `true` if the token may still be presented at `instant`.
	pub fn is_valid_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.state_at(instant), TokenState::Valid)
	}

	/// Convenience helper that checks validity against the current UTC instant.
	pub fn is_valid(&self) -> bool {
		self.is_valid_at(OffsetDateTime::now_utc())
	}

	/// Lifetime left at `instant`, clamped to zero.
	pub fn remaining_at(&self, instant: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - instant;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}

	pub(crate) fn authorization_header(&self) -> String {
		format!("Bearer {}", self.secret.expose())
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn state_flips_exactly_at_expiry() {
		let token = AccessToken::new(
			"access",
			macros::datetime!(2025-01-01 00:00 UTC),
			Duration::hours(1),
		);

		assert_eq!(token.expires_at, macros::datetime!(2025-01-01 01:00 UTC));
		assert_eq!(token.state_at(macros::datetime!(2025-01-01 00:59 UTC)), TokenState::Valid);
		assert_eq!(token.state_at(macros::datetime!(2025-01-01 01:00 UTC)), TokenState::Expired);
		assert_eq!(token.state_at(macros::datetime!(2025-01-01 02:00 UTC)), TokenState::Expired);
	}

	#[test]
	fn zero_lifetime_is_expired_on_arrival() {
		let now = OffsetDateTime::now_utc();
		let token = AccessToken::new("short", now, Duration::ZERO);

		assert!(!token.is_valid_at(now));
		assert_eq!(token.remaining_at(now + Duration::seconds(5)), Duration::ZERO);
	}

	#[test]
	fn authorization_header_uses_bearer_scheme() {
		let token = AccessToken::new("abc", OffsetDateTime::now_utc(), Duration::minutes(5));

		assert_eq!(token.authorization_header(), "Bearer abc");
		assert!(!format!("{token:?}").contains("abc"));
	}
}
