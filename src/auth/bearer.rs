//! Opaque bearer credential presented on every authenticated API call.

// self
use crate::_prelude::*;

/// Bearer credential in `Authorization` header form, e.g. `Bearer <access_token>`.
///
/// Immutable once issued; the client never refreshes or rewrites it. Formatters
/// redact the value so tokens stay out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerToken(String);
impl BearerToken {
	/// Wraps an access token string into its `Authorization` header form.
	pub fn new(access_token: impl AsRef<str>) -> Self {
		Self(format!("Bearer {}", access_token.as_ref()))
	}

	/// Returns the full header value. Callers must avoid logging this string.
	pub fn header_value(&self) -> &str {
		&self.0
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("BearerToken").field(&"<redacted>").finish()
	}
}
impl Display for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
