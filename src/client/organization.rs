//! Organization details lookup, the discovery step for the analytics endpoints.

// crates.io
use serde::de::{self, Deserializer, Visitor};
// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	client::AnalyticsClient,
	http::ApiTransport,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	service::OrganizationId,
};

/// Organization details returned by the organization endpoint; unknown fields are
/// ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
	/// Subdomain the organization is served from.
	pub subdomain_name: String,
	/// Organization id, as embedded in analytics endpoint paths. The wire value may
	/// be a string or an integer.
	#[serde(deserialize_with = "organization_id_from_json")]
	pub id: OrganizationId,
}

impl<C> AnalyticsClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Fetches the organization behind the configured credentials.
	///
	/// The returned id is what the analytics endpoints key on; feed it back into
	/// [`ServiceDescriptorBuilder::organization_id`](crate::service::ServiceDescriptorBuilder::organization_id)
	/// when it is not known up front.
	pub async fn organization(&self, token: &BearerToken) -> Result<Organization> {
		const KIND: FlowKind = FlowKind::Organization;

		let span = FlowSpan::new(KIND, "organization");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result =
			span.instrument(self.get_json(&self.descriptor.endpoints.organization, token)).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}

fn organization_id_from_json<'de, D>(deserializer: D) -> Result<OrganizationId, D::Error>
where
	D: Deserializer<'de>,
{
	struct IdVisitor;
	impl Visitor<'_> for IdVisitor {
		type Value = OrganizationId;

		fn expecting(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("an organization id as a string or an integer")
		}

		fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
		where
			E: de::Error,
		{
			OrganizationId::new(value).map_err(E::custom)
		}

		fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
		where
			E: de::Error,
		{
			OrganizationId::new(value.to_string()).map_err(E::custom)
		}

		fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
		where
			E: de::Error,
		{
			OrganizationId::new(value.to_string()).map_err(E::custom)
		}
	}

	deserializer.deserialize_any(IdVisitor)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn id_decodes_from_string_or_integer() {
		let by_string: Organization =
			serde_json::from_str(r#"{"subdomain_name":"acme","id":"8191"}"#)
				.expect("String id should decode.");
		let by_number: Organization =
			serde_json::from_str(r#"{"subdomain_name":"acme","id":8191}"#)
				.expect("Integer id should decode.");

		assert_eq!(by_string, by_number);
		assert_eq!(by_string.id.as_ref(), "8191");
	}

	#[test]
	fn extra_fields_are_ignored() {
		let organization: Organization = serde_json::from_str(
			r#"{"subdomain_name":"acme","id":"8191","name":"Acme Corp","tier":"enterprise"}"#,
		)
		.expect("Organization with extra fields should decode.");

		assert_eq!(organization.subdomain_name, "acme");
	}

	#[test]
	fn invalid_id_is_rejected() {
		assert!(
			serde_json::from_str::<Organization>(r#"{"subdomain_name":"acme","id":""}"#).is_err()
		);
	}
}
