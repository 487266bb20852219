//! RSA private key wrapper owned by the credential builder.

// crates.io
use jsonwebtoken::EncodingKey;
// self
use crate::{_prelude::*, error::ConfigError};

/// RSA private key used to sign login assertions.
///
/// Loaded once from PEM material and treated as read-only for the lifetime of the
/// process. The key never leaves this wrapper and never appears in log output.
#[derive(Clone)]
pub struct SigningKey(EncodingKey);
impl SigningKey {
	/// Parses an RSA private key from PEM bytes (PKCS#1 or PKCS#8).
	pub fn from_rsa_pem(pem: &[u8]) -> Result<Self, ConfigError> {
		EncodingKey::from_rsa_pem(pem)
			.map(Self)
			.map_err(|source| ConfigError::InvalidPrivateKey { source })
	}

	pub(crate) fn encoding(&self) -> &EncodingKey {
		&self.0
	}
}
impl Debug for SigningKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SigningKey").field(&"<redacted>").finish()
	}
}
