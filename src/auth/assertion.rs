//! Signed JWT assertion presented to the token endpoint (JWT-bearer grant).

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, Header};
// self
use crate::{_prelude::*, auth::SigningKey};

/// Errors raised while building or inspecting assertions.
#[derive(Debug, ThisError)]
pub enum AssertionError {
	/// The RS256 signature could not be produced.
	#[error("Assertion could not be signed.")]
	Sign {
		/// Underlying signing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// The compact serialization does not carry a claims segment.
	#[error("Assertion is not a three-segment compact JWT.")]
	Malformed,
	/// A segment is not valid URL-safe base64.
	#[error("Assertion segment is not URL-safe base64.")]
	SegmentEncoding(#[from] base64::DecodeError),
	/// The claims segment does not decode into claims JSON.
	#[error("Assertion claims segment is not valid claims JSON.")]
	ClaimsJson(#[from] serde_json::Error),
}

/// Registered claims carried by the login assertion.
///
/// Serialized in declaration order so the signing input is reproducible: issuer,
/// subject, audience, not-before, expiry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
	/// Issuer: the OAuth2 client identifier.
	pub iss: String,
	/// Subject: the user the client acts for.
	pub sub: String,
	/// Audience: the token service this assertion addresses.
	pub aud: String,
	/// Not-before instant, seconds since the Unix epoch.
	pub nbf: i64,
	/// Expiry instant, seconds since the Unix epoch.
	pub exp: i64,
}
impl AssertionClaims {
	/// Validity skew applied on both sides of `now`, tolerating clock drift between
	/// client and server. The resulting window is exactly two hours wide.
	pub const DEFAULT_SKEW: Duration = Duration::HOUR;

	/// Builds claims valid from `now - DEFAULT_SKEW` to `now + DEFAULT_SKEW`.
	pub fn at(
		issuer: impl Into<String>,
		subject: impl Into<String>,
		audience: impl Into<String>,
		now: OffsetDateTime,
	) -> Self {
		Self::with_skew(issuer, subject, audience, now, Self::DEFAULT_SKEW)
	}

	/// Builds claims with a caller-chosen skew on both sides of `now`.
	pub fn with_skew(
		issuer: impl Into<String>,
		subject: impl Into<String>,
		audience: impl Into<String>,
		now: OffsetDateTime,
		skew: Duration,
	) -> Self {
		let now = now.unix_timestamp();
		let skew = skew.whole_seconds();

		Self {
			iss: issuer.into(),
			sub: subject.into(),
			aud: audience.into(),
			nbf: now - skew,
			exp: now + skew,
		}
	}

	/// Checks the `nbf <= instant <= exp` validity invariant.
	pub fn is_current_at(&self, instant: OffsetDateTime) -> bool {
		let instant = instant.unix_timestamp();

		self.nbf <= instant && instant <= self.exp
	}
}

/// Compact signed JWT: `base64url(header).base64url(claims).base64url(signature)`.
///
/// The header is always `{"typ":"JWT","alg":"RS256"}` and every segment uses
/// URL-safe, unpadded base64. Created fresh per login and discarded after the
/// exchange; formatters redact it because the value is a credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Assertion(String);
impl Assertion {
	/// Signs the claims with the RSA key, producing the compact serialization.
	pub fn sign(claims: &AssertionClaims, key: &SigningKey) -> Result<Self, AssertionError> {
		jsonwebtoken::encode(&Header::new(Algorithm::RS256), claims, key.encoding())
			.map(Self)
			.map_err(|source| AssertionError::Sign { source })
	}

	/// Returns the compact serialization for embedding into the token request form.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Decodes the claims segment back into structured claims.
	///
	/// Decoding does not verify the signature; it exists so callers can inspect the
	/// validity window of an assertion they just produced.
	pub fn decode_claims(&self) -> Result<AssertionClaims, AssertionError> {
		let payload = self.0.split('.').nth(1).ok_or(AssertionError::Malformed)?;
		let bytes = URL_SAFE_NO_PAD.decode(payload)?;

		Ok(serde_json::from_slice(&bytes)?)
	}
}
impl Debug for Assertion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Assertion").field(&"<redacted>").finish()
	}
}
impl Display for Assertion {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
