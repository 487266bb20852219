//! Client-level error types shared across login, organization, and page fetches.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// JSON decode failure annotated with the path that failed to deserialize.
pub type JsonDecodeError = serde_path_to_error::Error<serde_json::Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential builder failure; no dependent fetch may run after one of these.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// An authenticated API fetch failed.
	#[error(transparent)]
	Request(#[from] RequestError),
}

/// Failures raised while exchanging the signed assertion for a bearer token.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Assertion could not be constructed or signed.
	#[error(transparent)]
	Assertion(#[from] crate::auth::AssertionError),
	/// Token endpoint could not be reached.
	#[error("Token endpoint could not be reached.")]
	Exchange {
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// Token endpoint rejected the login.
	#[error("Token endpoint rejected the login (HTTP {status}): {body}")]
	Rejected {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Raw response body, preserved for diagnosis.
		body: String,
	},
	/// Token endpoint returned a body that is not valid JSON for a token grant.
	#[error("Token endpoint returned malformed JSON (HTTP {status}).")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: JsonDecodeError,
		/// HTTP status code of the malformed response.
		status: u16,
	},
	/// Token endpoint answered 2xx but supplied no usable access token.
	#[error("Token endpoint response is missing an access_token.")]
	MissingAccessToken,
	/// Token endpoint issued a token of a type this client cannot present.
	#[error("Token endpoint issued an unsupported token type: {token_type}.")]
	UnsupportedTokenType {
		/// The `token_type` value reported by the endpoint.
		token_type: String,
	},
}

/// Failures raised by authenticated GET requests (organization, page fetches).
#[derive(Debug, ThisError)]
pub enum RequestError {
	/// The request could not be sent or the response never arrived.
	#[error("Request to {url} could not be completed.")]
	Send {
		/// Target URL of the failed request.
		url: Url,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// The endpoint answered with a non-success status.
	#[error("{url} returned HTTP {status}: {body}")]
	Status {
		/// Target URL of the failed request.
		url: Url,
		/// HTTP status code returned by the endpoint.
		status: u16,
		/// Raw response body, preserved for diagnosis.
		body: String,
	},
	/// The endpoint answered 2xx with a body that does not decode.
	#[error("{url} returned malformed JSON (HTTP {status}).")]
	MalformedBody {
		/// Target URL of the failed request.
		url: Url,
		/// HTTP status code of the malformed response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: JsonDecodeError,
	},
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Supplied PEM material is not a usable RSA private key.
	#[error("Signing key is not a usable RSA private key.")]
	InvalidPrivateKey {
		/// Underlying key parsing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// Descriptor carries no analytics endpoint because no organization id was configured.
	#[error("Descriptor has no analytics endpoint; configure an organization id.")]
	MissingOrganizationId,
	/// A query window timestamp could not be rendered as RFC 3339.
	#[error("Query window timestamp could not be formatted.")]
	TimestampFormat {
		/// Underlying formatting failure.
		#[source]
		source: time::error::Format,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, timeout, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request exceeded the transport's bounded timeout.
	#[error("Request timed out before the service answered.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() {
			Self::Timeout { source: Box::new(e) }
		} else {
			Self::Network { source: Box::new(e) }
		}
	}
}
