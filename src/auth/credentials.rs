//! OAuth 2.0 client credentials issued by the API provider.

// self
use crate::{_prelude::*, auth::Secret};

/// Validation failures raised while building [`Credentials`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CredentialsError {
	/// The client identifier is empty or whitespace-only.
	#[error("Client identifier must not be empty.")]
	EmptyClientId,
	/// The client secret is empty or whitespace-only.
	#[error("Client secret must not be empty.")]
	EmptyClientSecret,
}

/// Immutable `client_id`/`client_secret` pair presented to the token endpoint.
#[derive(Clone)]
pub struct Credentials {
	client_id: String,
	client_secret: Secret,
}
impl Credentials {
	/// Validates and wraps a credential pair.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Result<Self, CredentialsError> {
		let client_id = client_id.into().trim().to_owned();
		let client_secret = Secret::new(client_secret);

		if client_id.is_empty() {
			return Err(CredentialsError::EmptyClientId);
		}
		if client_secret.is_blank() {
			return Err(CredentialsError::EmptyClientSecret);
		}

		Ok(Self { client_id, client_secret })
	}

	/// OAuth 2.0 client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// OAuth 2.0 client secret.
	pub fn client_secret(&self) -> &Secret {
		&self.client_secret
	}

	/// Encodes the `client_credentials` grant as an `application/x-www-form-urlencoded` body.
	pub(crate) fn grant_form(&self) -> String {
		url::form_urlencoded::Serializer::new(String::new())
			.append_pair("grant_type", "client_credentials")
			.append_pair("client_id", &self.client_id)
			.append_pair("client_secret", self.client_secret.expose())
			.finish()
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.finish()
	}
}
