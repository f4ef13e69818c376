//! Cursor pagination over the dashboard's `Link` response header.
//!
//! List endpoints return at most `perPage` items and advertise neighbouring
//! pages in an RFC 8288 style header:
//!
//! ```text
//! Link: <https://api.meraki.com/api/v1/organizations/1/networks?perPage=3&startingAfter=N_3>; rel=next
//! ```
//!
//! The header is parsed structurally and the cursor is read from the link's
//! query string, so reordering of entries or parameters does not matter.

use std::future::Future;

use tracing::debug;
use url::Url;

use crate::client::QueryParams;
use crate::error::ProviderError;

/// One entry of a `Link` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Relation type(s), space separated as received.
    pub rel: String,
    /// Target of the link.
    pub url: Url,
}

/// A parsed `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkHeader {
    links: Vec<Link>,
}

impl LinkHeader {
    /// Parse a `Link` header value. Entries without a `rel` parameter or with
    /// an unparseable target are skipped.
    pub fn parse(header: &str) -> Self {
        let mut links = Vec::new();
        let mut rest = header;

        while let Some(start) = rest.find('<') {
            let after = &rest[start + 1..];
            let Some(end) = after.find('>') else {
                break;
            };
            let href = &after[..end];
            let tail = &after[end + 1..];
            let params_end = tail.find('<').unwrap_or(tail.len());
            let params = &tail[..params_end];
            rest = &tail[params_end..];

            let rel = params.split(';').find_map(|param| {
                let (key, value) = param.trim().split_once('=')?;
                if !key.trim().eq_ignore_ascii_case("rel") {
                    return None;
                }
                let value = value.trim().trim_end_matches(',').trim().trim_matches('"');
                Some(value.to_string())
            });

            match (rel, Url::parse(href)) {
                (Some(rel), Ok(url)) => links.push(Link { rel, url }),
                (rel, url) => {
                    debug!(href, ?rel, valid_url = url.is_ok(), "Skipping malformed Link entry")
                },
            }
        }

        Self { links }
    }

    /// All parsed links, in header order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Returns `true` when the header carried no usable links.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The first link carrying the given relation.
    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.links
            .iter()
            .find(|link| link.rel.split_whitespace().any(|r| r.eq_ignore_ascii_case(rel)))
    }

    /// The continuation cursor for `direction`, if the server offered one.
    pub fn cursor(&self, direction: Direction) -> Option<String> {
        let link = self.get(direction.rel())?;
        link.url
            .query_pairs()
            .find(|(key, _)| key == direction.cursor_param())
            .map(|(_, value)| value.into_owned())
    }
}

/// Which way to walk the result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Follow `rel=next` links using `startingAfter`.
    #[default]
    Next,
    /// Follow `rel=prev` links using `endingBefore`.
    Prev,
}

impl Direction {
    fn rel(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Prev => "prev",
        }
    }

    fn cursor_param(self) -> &'static str {
        match self {
            Self::Next => "startingAfter",
            Self::Prev => "endingBefore",
        }
    }
}

/// How a paginated listing should be fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Page size sent as `perPage`. Without it only the `Link` header ends the walk.
    pub per_page: Option<usize>,
    /// Stop after this many pages. `None` fetches everything.
    pub total_pages: Option<usize>,
    /// Walk direction.
    pub direction: Direction,
    /// Initial `startingAfter` cursor.
    pub starting_after: Option<String>,
    /// Initial `endingBefore` cursor.
    pub ending_before: Option<String>,
}

impl PageRequest {
    /// Fetch all pages of `per_page` items.
    pub fn with_per_page(per_page: usize) -> Self {
        Self {
            per_page: Some(per_page),
            ..Self::default()
        }
    }

    fn first_query(&self) -> PageQuery {
        PageQuery {
            per_page: self.per_page,
            starting_after: self.starting_after.clone(),
            ending_before: self.ending_before.clone(),
        }
    }
}

/// The pagination parameters of a single page request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    /// `perPage`
    pub per_page: Option<usize>,
    /// `startingAfter`
    pub starting_after: Option<String>,
    /// `endingBefore`
    pub ending_before: Option<String>,
}

impl PageQuery {
    /// Append the pagination parameters to a query string builder.
    pub fn append_to(&self, query: &mut QueryParams) {
        query.push_opt("perPage", self.per_page);
        query.push_opt("startingAfter", self.starting_after.as_deref());
        query.push_opt("endingBefore", self.ending_before.as_deref());
    }

    fn advance(&self, direction: Direction, cursor: String) -> Self {
        let mut next = Self {
            per_page: self.per_page,
            starting_after: None,
            ending_before: None,
        };
        match direction {
            Direction::Next => next.starting_after = Some(cursor),
            Direction::Prev => next.ending_before = Some(cursor),
        }
        next
    }

    fn cursor(&self, direction: Direction) -> Option<&str> {
        match direction {
            Direction::Next => self.starting_after.as_deref(),
            Direction::Prev => self.ending_before.as_deref(),
        }
    }
}

/// One fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page, in server order.
    pub items: Vec<T>,
    /// The page's `Link` header.
    pub link: LinkHeader,
}

/// Fetch pages sequentially and concatenate their items in fetch order.
///
/// The walk ends on the first of:
/// - a page with fewer than `per_page` items (or no items at all),
/// - `total_pages` pages fetched,
/// - no cursor for the walk direction in the page's `Link` header,
/// - the server handing back the cursor that was just used.
///
/// Items are not deduplicated across pages.
pub async fn paginate<T, F, Fut>(request: &PageRequest, mut fetch: F) -> Result<Vec<T>, ProviderError>
where
    F: FnMut(PageQuery) -> Fut,
    Fut: Future<Output = Result<Page<T>, ProviderError>>,
{
    let direction = request.direction;
    let mut items = Vec::new();
    let mut query = request.first_query();
    let mut fetched = 0usize;

    loop {
        let page = fetch(query.clone()).await?;
        fetched += 1;

        let count = page.items.len();
        items.extend(page.items);
        debug!(page = fetched, count, total = items.len(), "Fetched page");

        if request.total_pages.is_some_and(|limit| fetched >= limit) {
            break;
        }
        if count == 0 || request.per_page.is_some_and(|per_page| count < per_page) {
            break;
        }

        let Some(cursor) = page.link.cursor(direction) else {
            break;
        };
        if query.cursor(direction) == Some(cursor.as_str()) {
            debug!(%cursor, "Server repeated the current cursor; stopping");
            break;
        }
        query = query.advance(direction, cursor);
    }

    Ok(items)
}
