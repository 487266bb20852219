// crates.io
use url::Host;
// self
use crate::{
	_prelude::*,
	service::{
		DEFAULT_AUDIENCE, Environment, OrganizationId, OrganizationName, ServiceDescriptor,
		ServiceEndpoints,
	},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum ServiceDescriptorError {
	/// Staged environment names feed the API hostname and must stay DNS-safe.
	#[error("Environment name must contain only ASCII alphanumerics and dashes: {name:?}.")]
	InvalidEnvironment {
		/// Environment name that failed validation.
		name: String,
	},
	/// Endpoints must use HTTPS; plain HTTP is tolerated for loopback hosts only.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The API base URL does not name a host.
	#[error("API base URL must carry a host: {url}.")]
	MissingHost {
		/// Base URL that failed validation.
		url: String,
	},
	/// An endpoint URL could not be constructed.
	#[error("Endpoint URL could not be constructed.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		#[serde(skip)]
		source: url::ParseError,
	},
}

/// Builder for [`ServiceDescriptor`] values.
#[derive(Clone, Debug)]
pub struct ServiceDescriptorBuilder {
	/// Organization name for the descriptor being constructed.
	pub organization: OrganizationName,
	/// Optional organization id enabling the analytics endpoint.
	pub organization_id: Option<OrganizationId>,
	/// Deployment environment (defaults to production).
	pub environment: Environment,
	/// Optional assertion audience override.
	pub audience: Option<Url>,
	/// Optional base URL override pointing every endpoint at one server.
	pub api_base: Option<Url>,
}
impl ServiceDescriptorBuilder {
	/// Creates a new builder seeded with the provided organization name.
	pub fn new(organization: OrganizationName) -> Self {
		Self {
			organization,
			organization_id: None,
			environment: Environment::default(),
			audience: None,
			api_base: None,
		}
	}

	/// Sets the organization id, enabling the analytics transfers endpoint.
	pub fn organization_id(mut self, id: OrganizationId) -> Self {
		self.organization_id = Some(id);

		self
	}

	/// Overrides the deployment environment.
	pub fn environment(mut self, environment: Environment) -> Self {
		self.environment = environment;

		self
	}

	/// Overrides the assertion audience.
	pub fn audience(mut self, audience: Url) -> Self {
		self.audience = Some(audience);

		self
	}

	/// Points every endpoint at the provided base URL instead of the derived host.
	///
	/// Intended for test and mock servers; plain HTTP is accepted for loopback
	/// hosts only.
	pub fn api_base(mut self, base: Url) -> Self {
		self.api_base = Some(base);

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ServiceDescriptor, ServiceDescriptorError> {
		if let Environment::Staged(name) = &self.environment {
			validate_environment_name(name)?;
		}

		let base = match &self.api_base {
			Some(base) => {
				validate_base(base)?;

				base.clone()
			},
			None => Url::parse(&format!("https://{}/", self.environment.host()))
				.map_err(|source| ServiceDescriptorError::InvalidEndpoint { source })?,
		};
		let token = at_path(&base, &format!("api/v1/oauth2/{}/token", self.organization));
		let organization = at_path(&base, "api/v1/organization");
		let transfers = self
			.organization_id
			.as_ref()
			.map(|id| at_path(&base, &format!("analytics/v2/organizations/{id}/transfers")));
		let audience = match self.audience {
			Some(audience) => audience,
			None => Url::parse(DEFAULT_AUDIENCE)
				.map_err(|source| ServiceDescriptorError::InvalidEndpoint { source })?,
		};

		Ok(ServiceDescriptor {
			organization: self.organization,
			organization_id: self.organization_id,
			environment: self.environment,
			audience,
			endpoints: ServiceEndpoints { token, organization, transfers },
		})
	}
}

fn at_path(base: &Url, path: &str) -> Url {
	let mut url = base.clone();

	url.set_path(path);
	url.set_query(None);

	url
}

fn validate_environment_name(name: &str) -> Result<(), ServiceDescriptorError> {
	if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
		Err(ServiceDescriptorError::InvalidEnvironment { name: name.to_owned() })
	} else {
		Ok(())
	}
}

fn validate_base(base: &Url) -> Result<(), ServiceDescriptorError> {
	if base.host().is_none() {
		return Err(ServiceDescriptorError::MissingHost { url: base.to_string() });
	}

	match base.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(base) => Ok(()),
		_ => Err(ServiceDescriptorError::InsecureEndpoint {
			endpoint: "api_base",
			url: base.to_string(),
		}),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(Host::Ipv4(ip)) => ip.is_loopback(),
		Some(Host::Ipv6(ip)) => ip.is_loopback(),
		Some(Host::Domain(domain)) => domain == "localhost",
		None => false,
	}
}
