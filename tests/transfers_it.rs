// crates.io
use httpmock::prelude::*;
// self
use aspera_analytics::{
	_preludet::*,
	auth::BearerToken,
	client::TransferQuery,
	error::RequestError,
};

const TRANSFERS_PATH: &str = "/analytics/v2/organizations/8191/transfers";

// 2019-01-19T23:00:00Z / 2019-01-26T23:00:00Z.
fn demo_query() -> TransferQuery {
	let start = OffsetDateTime::from_unix_timestamp(1_547_938_800)
		.expect("Window start fixture should be valid.");
	let stop = OffsetDateTime::from_unix_timestamp(1_548_543_600)
		.expect("Window stop fixture should be valid.");

	TransferQuery::new(start, stop).with_limit(3)
}

#[tokio::test]
async fn walk_follows_next_links_in_order() {
	let server = MockServer::start_async().await;
	let client = build_test_client(&server.base_url());
	let token = BearerToken::new("abc123");
	let page_two_url = format!("{}{}?cursor=2", server.base_url(), TRANSFERS_PATH);
	let first = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(TRANSFERS_PATH)
				.header("authorization", "Bearer abc123")
				.query_param("start_time", "2019-01-19T23:00:00Z")
				.query_param("stop_time", "2019-01-26T23:00:00Z")
				.query_param("limit", "3");
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"data\":[{{\"id\":1}},{{\"id\":2}},{{\"id\":3}}],\"next\":{{\"href\":\"{page_two_url}\"}}}}",
			));
		})
		.await;
	let second = server
		.mock_async(|when, then| {
			when.method(GET).path(TRANSFERS_PATH).query_param("cursor", "2");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"data\":[{\"id\":4}]}");
		})
		.await;
	let pager = client.transfers(&token, &demo_query()).expect("Pager construction should succeed.");
	let pages = pager.collect_remaining().await.expect("Two-page walk should complete.");

	assert_eq!(pages.len(), 2);
	assert_eq!(pages[0].data.len(), 3);
	assert_eq!(pages[1].data.len(), 1);
	assert!(pages[1].is_last());

	first.assert_async().await;
	second.assert_async().await;
}

#[tokio::test]
async fn fetch_all_respects_the_page_cap() {
	let server = MockServer::start_async().await;
	let client = build_test_client(&server.base_url());
	let token = BearerToken::new("abc123");
	// Every response links back to itself; only the cap can end this walk.
	let loop_url = format!("{}/loop", server.base_url());
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/loop");
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"data\":[{{\"id\":1}}],\"next\":{{\"href\":\"{loop_url}\"}}}}",
			));
		})
		.await;
	let start = Url::parse(&loop_url).expect("Loop URL should parse.");
	let pages = client
		.fetch_all(start, &token, Some(2))
		.await
		.expect("Capped walk should complete.");

	assert_eq!(pages.len(), 2);

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn fetch_all_is_unbounded_by_default() {
	let server = MockServer::start_async().await;
	let client = build_test_client(&server.base_url());
	let token = BearerToken::new("abc123");
	let next_url = format!("{}/tail", server.base_url());
	let head = server
		.mock_async(|when, then| {
			when.method(GET).path("/head");
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"data\":[{{\"id\":1}}],\"next\":{{\"href\":\"{next_url}\"}}}}",
			));
		})
		.await;
	let tail = server
		.mock_async(|when, then| {
			when.method(GET).path("/tail");
			then.status(200).header("content-type", "application/json").body("{\"data\":[]}");
		})
		.await;
	let start =
		Url::parse(&format!("{}/head", server.base_url())).expect("Start URL should parse.");
	let pages =
		client.fetch_all(start, &token, None).await.expect("Unbounded walk should complete.");

	assert_eq!(pages.len(), 2);

	head.assert_async().await;
	tail.assert_async().await;
}

#[tokio::test]
async fn mid_walk_failure_keeps_the_fetched_pages() {
	let server = MockServer::start_async().await;
	let client = build_test_client(&server.base_url());
	let token = BearerToken::new("abc123");
	let boom_url = format!("{}/boom", server.base_url());
	let _head = server
		.mock_async(|when, then| {
			when.method(GET).path("/head");
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"data\":[{{\"id\":1}},{{\"id\":2}}],\"next\":{{\"href\":\"{boom_url}\"}}}}",
			));
		})
		.await;
	let _boom = server
		.mock_async(|when, then| {
			when.method(GET).path("/boom");
			then.status(500).body("upstream exploded");
		})
		.await;
	let start =
		Url::parse(&format!("{}/head", server.base_url())).expect("Start URL should parse.");
	let err = client
		.fetch_all(start, &token, None)
		.await
		.expect_err("The failing second page must abort the walk.");

	assert_eq!(err.pages.len(), 1);
	assert_eq!(err.pages[0].data.len(), 2);
	assert!(matches!(
		*err.source,
		Error::Request(RequestError::Status { status: 500, .. }),
	));
}

#[tokio::test]
async fn unauthorized_page_fetch_is_never_an_empty_page() {
	let server = MockServer::start_async().await;
	let client = build_test_client(&server.base_url());
	let token = BearerToken::new("expired");
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path(TRANSFERS_PATH);
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_token\"}");
		})
		.await;
	let url = Url::parse(&format!("{}{}", server.base_url(), TRANSFERS_PATH))
		.expect("Transfers URL should parse.");
	let err = client
		.fetch_page(&url, &token)
		.await
		.expect_err("A 401 must be a typed error, not an empty page.");

	assert!(matches!(
		err,
		Error::Request(RequestError::Status { status: 401, .. }),
	));
}

#[tokio::test]
async fn transfers_requires_a_configured_organization_id() {
	let server = MockServer::start_async().await;
	let descriptor = {
		use aspera_analytics::service::{OrganizationName, ServiceDescriptor};

		let base = Url::parse(&server.base_url()).expect("Mock base URL should parse.");

		ServiceDescriptor::builder(
			OrganizationName::new("acme").expect("Organization name fixture should be valid."),
		)
		.api_base(base)
		.build()
		.expect("Descriptor without an organization id should build.")
	};
	let client = aspera_analytics::client::AnalyticsClient::with_http_client(
		descriptor,
		"client1",
		"client1-secret",
		"user@example.com",
		test_signing_key(),
		test_reqwest_http_client(),
	);
	let err = client
		.transfers(&BearerToken::new("abc123"), &demo_query())
		.expect_err("A descriptor without an organization id cannot start a walk.");

	assert!(matches!(
		err,
		Error::Config(aspera_analytics::error::ConfigError::MissingOrganizationId),
	));
}
