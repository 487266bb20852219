//! Transfers collection: query window construction and page walking.

// crates.io
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	client::AnalyticsClient,
	error::ConfigError,
	http::ApiTransport,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	pages::{PageResponse, PageWalkError, Pager},
};

/// Time window and page size for the transfers collection.
///
/// `limit` is forwarded verbatim; the service, not this client, decides what page
/// sizes it accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferQuery {
	/// Inclusive window start.
	pub start_time: OffsetDateTime,
	/// Exclusive window end.
	pub stop_time: OffsetDateTime,
	/// Page size requested from the service, when set.
	pub limit: Option<u32>,
}
impl TransferQuery {
	/// Creates a query for the provided window with no page size preference.
	pub fn new(start_time: OffsetDateTime, stop_time: OffsetDateTime) -> Self {
		Self { start_time, stop_time, limit: None }
	}

	/// Requests a specific page size.
	pub fn with_limit(mut self, limit: u32) -> Self {
		self.limit = Some(limit);

		self
	}

	/// Appends the window as query parameters, percent-encoded exactly once.
	pub(crate) fn apply(&self, url: &mut Url) -> Result<(), ConfigError> {
		let start_time = self
			.start_time
			.format(&Rfc3339)
			.map_err(|source| ConfigError::TimestampFormat { source })?;
		let stop_time = self
			.stop_time
			.format(&Rfc3339)
			.map_err(|source| ConfigError::TimestampFormat { source })?;
		let mut pairs = url.query_pairs_mut();

		pairs.append_pair("start_time", &start_time).append_pair("stop_time", &stop_time);

		if let Some(limit) = self.limit {
			pairs.append_pair("limit", &limit.to_string());
		}

		Ok(())
	}
}

impl<C> AnalyticsClient<C>
where
	C: ?Sized + ApiTransport,
{
	/// Starts a lazy walk over the transfers matching `query`.
	///
	/// Requires a descriptor built with an organization id; discover one via
	/// [`organization`](AnalyticsClient::organization) otherwise.
	pub fn transfers<'a>(
		&'a self,
		token: &'a BearerToken,
		query: &TransferQuery,
	) -> Result<Pager<'a, C>> {
		let base = self
			.descriptor
			.endpoints
			.transfers
			.as_ref()
			.ok_or(ConfigError::MissingOrganizationId)?;
		let mut url = base.clone();

		query.apply(&mut url)?;

		Ok(Pager::new(self, token, url))
	}

	/// Fetches a single page at `url`.
	///
	/// A non-success status is a typed error; it is never folded into an empty page.
	pub async fn fetch_page(&self, url: &Url, token: &BearerToken) -> Result<PageResponse> {
		self.get_json(url, token).await
	}

	/// Walks the collection starting at `url`, following each `next` link verbatim
	/// until the collection ends or `max_pages` fetches have happened.
	///
	/// On a mid-walk failure the pages already fetched ride along inside the
	/// returned [`PageWalkError`].
	pub async fn fetch_all(
		&self,
		start: Url,
		token: &BearerToken,
		max_pages: Option<usize>,
	) -> Result<Vec<PageResponse>, PageWalkError> {
		const KIND: FlowKind = FlowKind::Transfers;

		let span = FlowSpan::new(KIND, "fetch_all");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let mut pager = Pager::new(self, token, start);

		if let Some(max_pages) = max_pages {
			pager = pager.with_max_pages(max_pages);
		}

		let result = span.instrument(pager.collect_remaining()).await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn window_encodes_exactly_once() {
		let query = TransferQuery::new(
			datetime!(2019-01-19 23:00:00 UTC),
			datetime!(2019-01-26 23:00:00 UTC),
		)
		.with_limit(3);
		let mut url = Url::parse("https://api.ibmaspera.com/analytics/v2/organizations/8191/transfers")
			.expect("Transfers URL fixture should parse.");

		query.apply(&mut url).expect("Query application should succeed.");

		assert_eq!(
			url.query(),
			Some(
				"start_time=2019-01-19T23%3A00%3A00Z&stop_time=2019-01-26T23%3A00%3A00Z&limit=3"
			),
		);
	}

	#[test]
	fn limit_is_caller_supplied_and_optional() {
		let query = TransferQuery::new(
			datetime!(2024-06-01 00:00:00 UTC),
			datetime!(2024-06-08 00:00:00 UTC),
		);
		let mut url =
			Url::parse("https://api.ibmaspera.com/analytics/v2/organizations/8191/transfers")
				.expect("Transfers URL fixture should parse.");

		query.apply(&mut url).expect("Query application should succeed.");

		assert!(!url.query().expect("Query should be present.").contains("limit"));

		let mut capped = url.clone();

		capped.set_query(None);
		TransferQuery::new(
			datetime!(2024-06-01 00:00:00 UTC),
			datetime!(2024-06-08 00:00:00 UTC),
		)
		.with_limit(u32::MAX)
		.apply(&mut capped)
		.expect("Query application should succeed.");

		assert!(capped.query().expect("Query should be present.").ends_with("limit=4294967295"));
	}
}
