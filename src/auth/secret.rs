//! Redacting wrapper for the client secret and issued bearer tokens.

// self
use crate::_prelude::*;

const REDACTED: &str = "<redacted>";

/// Credential material that must never reach logs, spans, or error messages.
///
/// Both formatters print a fixed placeholder; [`Secret::expose`] is the only way to read the
/// value, and it is called solely when building the grant form and the `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);
impl Secret {
	/// Wraps `value`.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw value, for wire encoding only.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// `true` when nothing but whitespace was supplied.
	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}
}
impl From<String> for Secret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Secret({REDACTED})")
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(REDACTED)
	}
}
