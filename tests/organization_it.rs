// crates.io
use httpmock::prelude::*;
// self
use aspera_analytics::{_preludet::*, auth::BearerToken, error::RequestError};

#[tokio::test]
async fn organization_returns_subdomain_and_id() {
	let server = MockServer::start_async().await;
	let client = build_test_client(&server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/organization")
				.header("authorization", "Bearer abc123");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"subdomain_name\":\"acme\",\"id\":8191,\"name\":\"Acme Corp\"}");
		})
		.await;
	let organization = client
		.organization(&BearerToken::new("abc123"))
		.await
		.expect("Organization lookup should succeed.");

	assert_eq!(organization.subdomain_name, "acme");
	assert_eq!(organization.id.as_ref(), "8191");

	mock.assert_async().await;
}

#[tokio::test]
async fn organization_surfaces_unauthorized_as_a_request_error() {
	let server = MockServer::start_async().await;
	let client = build_test_client(&server.base_url());
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/organization");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_token\"}");
		})
		.await;
	let err = client
		.organization(&BearerToken::new("expired"))
		.await
		.expect_err("A 401 must surface as a request error.");

	match err {
		Error::Request(RequestError::Status { status, body, .. }) => {
			assert_eq!(status, 401);
			assert!(body.contains("invalid_token"));
		},
		other => panic!("Expected RequestError::Status, got {other:?}."),
	}
}

#[tokio::test]
async fn organization_rejects_malformed_bodies() {
	let server = MockServer::start_async().await;
	let client = build_test_client(&server.base_url());
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/organization");
			then.status(200).header("content-type", "application/json").body("{\"id\":");
		})
		.await;
	let err = client
		.organization(&BearerToken::new("abc123"))
		.await
		.expect_err("A truncated body must surface as a request error.");

	assert!(matches!(err, Error::Request(RequestError::MalformedBody { .. })));
}
