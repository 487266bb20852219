//! Transport primitives for the token exchange and authenticated API fetches.
//!
//! The module exposes [`ApiTransport`] so downstream crates can integrate custom
//! HTTP stacks. Implementations speak exactly two verbs: a form-encoded POST with
//! HTTP Basic credentials (the token exchange) and a GET carrying an
//! `Authorization` header (organization and page fetches). Responses come back as
//! [`RawResponse`] values, status plus raw bytes, so the client layer owns success
//! classification and JSON decoding.

// self
use crate::{_prelude::*, error::TransportError};

/// Boxed response future returned by [`ApiTransport`] implementations.
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// Form-encoded POST with HTTP Basic authentication.
///
/// Form values are passed unencoded; the transport applies standard
/// `application/x-www-form-urlencoded` encoding exactly once.
#[derive(Clone, Copy, Debug)]
pub struct FormRequest<'a> {
	/// Target URL.
	pub url: &'a Url,
	/// HTTP Basic username.
	pub username: &'a str,
	/// HTTP Basic password.
	pub password: Option<&'a str>,
	/// Form fields in submission order.
	pub form: &'a [(&'a str, &'a str)],
}

/// GET request carrying a prebuilt `Authorization` header value.
#[derive(Clone, Copy, Debug)]
pub struct GetRequest<'a> {
	/// Target URL, followed verbatim (it already carries its query parameters).
	pub url: &'a Url,
	/// Full `Authorization` header value.
	pub authorization: &'a str,
}

/// Raw HTTP response surfaced to the client layer.
#[derive(Clone, Debug, Default)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Renders the body as text for error reporting, replacing invalid UTF-8.
	pub fn text_lossy(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.body)
	}
}

/// Abstraction over HTTP stacks capable of executing the client's two request shapes.
///
/// The trait is the client's only dependency on an HTTP stack. Implementations must
/// be `Send + Sync + 'static` so a client can be shared without additional
/// wrappers, and the returned futures must be `Send` for the lifetime of the
/// in-flight request. Implementations must not retry; a failed call surfaces as a
/// single [`TransportError`].
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes a form-encoded POST with HTTP Basic authentication.
	fn post_form<'a>(&'a self, request: FormRequest<'a>) -> TransportFuture<'a>;

	/// Executes a GET with an `Authorization` header.
	fn get<'a>(&'a self, request: GetRequest<'a>) -> TransportFuture<'a>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// [`ReqwestHttpClient::new`] applies a bounded request timeout so no call can hang
/// indefinitely, and disables redirect following: the token endpoint returns results
/// directly instead of delegating to another URI, and pagination links are followed
/// explicitly by the page walker. Configure any custom [`ReqwestClient`] the same
/// way before wrapping it with [`ReqwestHttpClient::with_client`].
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Bounded per-request timeout applied by [`ReqwestHttpClient::new`].
	pub const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

	/// Builds a transport with the crate's default timeout and redirect policy.
	pub fn new() -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(Self::REQUEST_TIMEOUT)
			.redirect(reqwest::redirect::Policy::none())
			.build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestHttpClient {
	fn post_form<'a>(&'a self, request: FormRequest<'a>) -> TransportFuture<'a> {
		Box::pin(async move {
			let response = self
				.0
				.post(request.url.clone())
				.basic_auth(request.username, request.password)
				.form(request.form)
				.send()
				.await
				.map_err(TransportError::from)?;

			read_response(response).await
		})
	}

	fn get<'a>(&'a self, request: GetRequest<'a>) -> TransportFuture<'a> {
		Box::pin(async move {
			let response = self
				.0
				.get(request.url.clone())
				.header(reqwest::header::AUTHORIZATION, request.authorization)
				.send()
				.await
				.map_err(TransportError::from)?;

			read_response(response).await
		})
	}
}

#[cfg(feature = "reqwest")]
async fn read_response(response: reqwest::Response) -> Result<RawResponse, TransportError> {
	let status = response.status().as_u16();
	let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

	Ok(RawResponse { status, body })
}
