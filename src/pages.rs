//! Page model and lazy walker for cursor-paginated collections.
//!
//! A paged collection terminates when a response omits its `next` link; running out
//! of pages is a defined terminal condition, never an error. Walks are lazy,
//! finite, and non-restartable: each fetch is a side effect, so a consumed or
//! failed cursor is never re-issued implicitly.

// self
use crate::{
	_prelude::*,
	auth::BearerToken,
	client::AnalyticsClient,
	http::ApiTransport,
};

/// Navigation link supplied inside a page response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
	/// Fully qualified URL, already carrying the original query parameters.
	pub href: Url,
}

/// One page of a paginated collection.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
	/// Result items in server-supplied order.
	#[serde(default)]
	pub data: Vec<serde_json::Value>,
	/// Link to the next page; absent on the final page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub next: Option<PageLink>,
	/// Link back to the first page of the collection.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub first: Option<PageLink>,
}
impl PageResponse {
	/// Returns `true` when this page terminates the collection.
	pub fn is_last(&self) -> bool {
		self.next.is_none()
	}
}

/// Error aborting a page walk, carrying the pages fetched before the failure.
#[derive(Debug, ThisError)]
#[error("Page walk aborted after {} page(s).", .pages.len())]
pub struct PageWalkError {
	/// Pages fetched before the failure, in server-supplied order.
	pub pages: Vec<PageResponse>,
	/// Failure that aborted the walk.
	#[source]
	pub source: Box<Error>,
}

/// Lazy walker over a paginated collection.
///
/// Yields pages one fetch at a time, following each response's `next` link
/// verbatim until the collection ends or the configured page cap is reached.
/// After a fetch error the walker is exhausted; the failed cursor is not retried.
#[derive(Debug)]
pub struct Pager<'a, C>
where
	C: ?Sized + ApiTransport,
{
	client: &'a AnalyticsClient<C>,
	token: &'a BearerToken,
	next: Option<Url>,
	fetched: usize,
	max_pages: Option<usize>,
}
impl<'a, C> Pager<'a, C>
where
	C: ?Sized + ApiTransport,
{
	pub(crate) fn new(client: &'a AnalyticsClient<C>, token: &'a BearerToken, start: Url) -> Self {
		Self { client, token, next: Some(start), fetched: 0, max_pages: None }
	}

	/// Caps the walk at `max_pages` fetches (unbounded by default).
	pub fn with_max_pages(mut self, max_pages: usize) -> Self {
		self.max_pages = Some(max_pages);

		self
	}

	/// Number of pages fetched so far.
	pub fn fetched(&self) -> usize {
		self.fetched
	}

	/// Returns `true` once the walker has no further cursor to follow.
	pub fn is_exhausted(&self) -> bool {
		self.next.is_none()
	}

	/// Fetches the next page, or `Ok(None)` when the collection is exhausted or the
	/// page cap has been reached.
	pub async fn try_next(&mut self) -> Result<Option<PageResponse>> {
		if self.max_pages.is_some_and(|max| self.fetched >= max) {
			return Ok(None);
		}

		let Some(url) = self.next.take() else {
			return Ok(None);
		};
		let page = self.client.fetch_page(&url, self.token).await?;

		self.fetched += 1;
		self.next = page.next.as_ref().map(|link| link.href.clone());

		Ok(Some(page))
	}

	/// Drains the walker, collecting every remaining page.
	///
	/// On failure the pages already fetched are preserved inside the returned
	/// [`PageWalkError`] instead of being discarded.
	pub async fn collect_remaining(mut self) -> Result<Vec<PageResponse>, PageWalkError> {
		let mut pages = Vec::new();

		loop {
			match self.try_next().await {
				Ok(Some(page)) => pages.push(page),
				Ok(None) => return Ok(pages),
				Err(source) => return Err(PageWalkError { pages, source: Box::new(source) }),
			}
		}
	}
}
