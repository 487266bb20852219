//! Descriptor of the remote service: environment, organization, and derived endpoints.
//!
//! The descriptor replaces ad-hoc constants files with one validated value built
//! up front and passed explicitly into the client; no process-wide configuration
//! state exists anywhere in the crate.

/// Builder API for assembling service descriptors.
pub mod builder;
/// Validated organization identifiers.
pub mod id;

pub use builder::*;
pub use id::*;

// self
use crate::_prelude::*;

/// Audience presented in login assertions unless overridden.
///
/// The token service expects this fixed audience for every environment.
pub const DEFAULT_AUDIENCE: &str = "https://api.asperafiles.com/api/v1/oauth2/token";

/// Deployment environment the client addresses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
	/// The production API at `api.ibmaspera.com`.
	#[default]
	Production,
	/// A staged deployment, e.g. `qa`, served from `api.<name>.ibmaspera.com`.
	Staged(String),
}
impl Environment {
	/// Returns the API host for this environment.
	pub fn host(&self) -> String {
		match self {
			Self::Production => "api.ibmaspera.com".into(),
			Self::Staged(name) => format!("api.{name}.ibmaspera.com"),
		}
	}
}

/// Endpoint set derived for a service descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoints {
	/// Token endpoint used for the JWT-bearer exchange.
	pub token: Url,
	/// Organization details endpoint.
	pub organization: Url,
	/// Transfers collection endpoint; present once an organization id is configured.
	pub transfers: Option<Url>,
}

/// Immutable service descriptor consumed by the client.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
	/// Organization name embedded in the token endpoint path.
	pub organization: OrganizationName,
	/// Organization id embedded in the analytics path, when known.
	pub organization_id: Option<OrganizationId>,
	/// Deployment environment the endpoints were derived for.
	pub environment: Environment,
	/// Audience carried by login assertions.
	pub audience: Url,
	/// Endpoint definitions derived at build time.
	pub endpoints: ServiceEndpoints,
}
impl ServiceDescriptor {
	/// Creates a new builder for the provided organization name.
	pub fn builder(organization: OrganizationName) -> ServiceDescriptorBuilder {
		ServiceDescriptorBuilder::new(organization)
	}
}
