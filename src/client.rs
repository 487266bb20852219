//! High-level client orchestrating login, organization lookup, and page walks.

pub mod login;
pub mod organization;
pub mod transfers;

pub use login::*;
pub use organization::*;
pub use transfers::*;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{BearerToken, SigningKey},
	error::{JsonDecodeError, RequestError},
	http::{ApiTransport, GetRequest},
	service::ServiceDescriptor,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestAnalyticsClient = AnalyticsClient<ReqwestHttpClient>;

/// Coordinates the credential builder and the authenticated fetches against one
/// service descriptor.
///
/// The client owns the HTTP transport, the descriptor, the signing key, and the
/// OAuth2 client credentials, so individual operations can focus on their request
/// shapes. All state is read-only after construction; the only value that flows
/// between operations is the [`BearerToken`] returned by
/// [`login`](AnalyticsClient::login), which callers pass explicitly into each
/// fetch.
pub struct AnalyticsClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// HTTP transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Service descriptor defining endpoints and the assertion audience.
	pub descriptor: ServiceDescriptor,
	/// OAuth2 client identifier; doubles as the assertion issuer.
	pub client_id: String,
	/// User the client acts for; doubles as the assertion subject.
	pub user_email: String,
	client_secret: String,
	signing_key: SigningKey,
	scope: String,
	assertion_skew: Duration,
}
impl<C> AnalyticsClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		descriptor: ServiceDescriptor,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		user_email: impl Into<String>,
		signing_key: SigningKey,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			descriptor,
			client_id: client_id.into(),
			user_email: user_email.into(),
			client_secret: client_secret.into(),
			signing_key,
			scope: login::DEFAULT_SCOPE.into(),
			assertion_skew: crate::auth::AssertionClaims::DEFAULT_SKEW,
		}
	}

	/// Overrides the scope requested during login (defaults to `admin:all`).
	pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = scope.into();

		self
	}

	/// Overrides the assertion validity skew (defaults to one hour each side).
	pub fn with_assertion_skew(mut self, skew: Duration) -> Self {
		self.assertion_skew = if skew.is_negative() { Duration::ZERO } else { skew };

		self
	}

	pub(crate) fn scope(&self) -> &str {
		&self.scope
	}

	pub(crate) fn client_secret(&self) -> &str {
		&self.client_secret
	}

	pub(crate) fn signing_key(&self) -> &SigningKey {
		&self.signing_key
	}

	pub(crate) fn assertion_skew(&self) -> Duration {
		self.assertion_skew
	}

	/// Authenticated GET decoded as JSON, shared by every fetching operation.
	pub(crate) async fn get_json<T>(&self, url: &Url, token: &BearerToken) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let request = GetRequest { url, authorization: token.header_value() };
		let response = self
			.http_client
			.get(request)
			.await
			.map_err(|source| RequestError::Send { url: url.clone(), source })?;

		if !response.is_success() {
			return Err(RequestError::Status {
				url: url.clone(),
				status: response.status,
				body: response.text_lossy().into_owned(),
			}
			.into());
		}

		parse_json(&response.body).map_err(|source| {
			RequestError::MalformedBody { url: url.clone(), status: response.status, source }.into()
		})
	}
}
#[cfg(feature = "reqwest")]
impl AnalyticsClient<ReqwestHttpClient> {
	/// Creates a client with the crate's default reqwest transport.
	pub fn new(
		descriptor: ServiceDescriptor,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		user_email: impl Into<String>,
		signing_key: SigningKey,
	) -> Result<Self> {
		Ok(Self::with_http_client(
			descriptor,
			client_id,
			client_secret,
			user_email,
			signing_key,
			ReqwestHttpClient::new()?,
		))
	}
}
impl<C> Clone for AnalyticsClient<C>
where
	C: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			descriptor: self.descriptor.clone(),
			client_id: self.client_id.clone(),
			user_email: self.user_email.clone(),
			client_secret: self.client_secret.clone(),
			signing_key: self.signing_key.clone(),
			scope: self.scope.clone(),
			assertion_skew: self.assertion_skew,
		}
	}
}
impl<C> Debug for AnalyticsClient<C>
where
	C: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AnalyticsClient")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.client_id)
			.field("user_email", &self.user_email)
			.field("client_secret_set", &!self.client_secret.is_empty())
			.finish()
	}
}

/// Decodes JSON while tracking the path of any failure for diagnostics.
pub(crate) fn parse_json<T>(bytes: &[u8]) -> Result<T, JsonDecodeError>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer)
}
