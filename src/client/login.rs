//! JWT-bearer login: sign an assertion, exchange it, keep the bearer token opaque.
//!
//! The exchange either yields a well-formed [`BearerToken`] or a typed
//! [`AuthError`]; there is no path that returns a token built from a missing or
//! partial grant, and no dependent fetch can run until a login has succeeded.

// self
use crate::{
	_prelude::*,
	auth::{Assertion, AssertionClaims, BearerToken},
	client::{AnalyticsClient, parse_json},
	error::AuthError,
	http::{ApiTransport, FormRequest},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Grant type presented to the token endpoint.
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Scope requested during login unless overridden on the client.
pub const DEFAULT_SCOPE: &str = "admin:all";

/// Token endpoint response shape; unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct TokenGrant {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	token_type: Option<String>,
}

impl<C> AnalyticsClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Exchanges a freshly signed assertion for a bearer token.
	///
	/// The assertion claims are stamped at the current instant with the client's
	/// configured skew, signed RS256, and submitted form-encoded together with the
	/// grant type and scope under HTTP Basic client credentials.
	pub async fn login(&self) -> Result<BearerToken> {
		const KIND: FlowKind = FlowKind::Login;

		let span = FlowSpan::new(KIND, "login");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.exchange_assertion()).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn exchange_assertion(&self) -> Result<BearerToken> {
		let claims = AssertionClaims::with_skew(
			&self.client_id,
			&self.user_email,
			self.descriptor.audience.as_str(),
			OffsetDateTime::now_utc(),
			self.assertion_skew(),
		);
		let assertion = Assertion::sign(&claims, self.signing_key()).map_err(AuthError::from)?;
		let form = [
			("assertion", assertion.as_str()),
			("grant_type", JWT_BEARER_GRANT_TYPE),
			("scope", self.scope()),
		];
		let request = FormRequest {
			url: &self.descriptor.endpoints.token,
			username: &self.client_id,
			password: Some(self.client_secret()),
			form: &form,
		};
		let response = self
			.http_client
			.post_form(request)
			.await
			.map_err(|source| AuthError::Exchange { source })?;

		if !response.is_success() {
			return Err(AuthError::Rejected {
				status: response.status,
				body: response.text_lossy().into_owned(),
			}
			.into());
		}

		let grant: TokenGrant = parse_json(&response.body)
			.map_err(|source| AuthError::MalformedResponse { source, status: response.status })?;

		if let Some(token_type) = grant.token_type.as_deref() {
			if !token_type.eq_ignore_ascii_case("bearer") {
				return Err(AuthError::UnsupportedTokenType { token_type: token_type.to_owned() }
					.into());
			}
		}

		grant
			.access_token
			.filter(|token| !token.is_empty())
			.map(BearerToken::new)
			.ok_or_else(|| AuthError::MissingAccessToken.into())
	}
}
