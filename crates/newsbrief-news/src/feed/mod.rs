//! News feed retrieval for a company query.

mod rss;
mod search_page;

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};

use crate::error::NewsError;
use crate::types::NewsItem;

use rss::parse_rss_feed;
use search_page::parse_search_page;

const DEFAULT_BASE_URL: &str = "https://news.google.com/";

/// Upper bound on items returned by one fetch.
pub const MAX_ITEMS: usize = 10;

/// Fixed locale parameters appended to every feed query.
const LOCALE_PARAMS: &str = "hl=en-IN&gl=IN&ceid=IN:en";

/// Retrieves recent news items for a company.
///
/// Requests the RSS search feed first. Only when that succeeds with zero
/// items does it request the HTML search page once and scrape it. Transport
/// errors, non-2xx statuses, and malformed XML are returned to the caller
/// without retrying.
pub struct FeedFetcher {
    client: Client,
    base_url: Url,
}

impl FeedFetcher {
    /// Creates a fetcher pointed at the production news origin.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, NewsError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs, user_agent)
    }

    /// Creates a fetcher against a custom origin (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`NewsError::Http`] if the client cannot be built, or
    /// [`NewsError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, NewsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so relative joins land under the origin.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| NewsError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches at most [`MAX_ITEMS`] news items for `company`.
    ///
    /// # Errors
    ///
    /// - [`NewsError::Http`] on network failure.
    /// - [`NewsError::UnexpectedStatus`] on a non-2xx response.
    /// - [`NewsError::Xml`] if the RSS document is malformed.
    pub async fn fetch(&self, company: &str) -> Result<Vec<NewsItem>, NewsError> {
        let rss_url = self.search_url("rss/search", company);
        let body = self.get_text(&rss_url).await?;
        let items = parse_rss_feed(&body, MAX_ITEMS)?;
        tracing::debug!(company, count = items.len(), "parsed RSS feed items");

        if !items.is_empty() {
            return Ok(items);
        }

        tracing::info!(
            company,
            "RSS feed returned no items, falling back to search page"
        );
        let page_url = self.search_url("search", company);
        let html = self.get_text(&page_url).await?;
        let items = parse_search_page(&html, &self.base_url, MAX_ITEMS);
        tracing::debug!(company, count = items.len(), "parsed search page items");
        Ok(items)
    }

    fn search_url(&self, path: &str, company: &str) -> String {
        let encoded = utf8_percent_encode(company, NON_ALPHANUMERIC);
        format!("{}{path}?q={encoded}&{LOCALE_PARAMS}", self.base_url)
    }

    async fn get_text(&self, url: &str) -> Result<String, NewsError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}
