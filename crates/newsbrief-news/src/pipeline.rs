//! End-to-end company analysis.

use crate::aggregate::Aggregator;
use crate::classifier::{ClassificationBackend, RetryDelay};
use crate::error::NewsError;
use crate::feed::FeedFetcher;
use crate::types::CompanyAnalysis;

/// Fetch news for `company` and annotate every item.
///
/// 1. Fetch up to ten items (RSS, falling back to the search page when empty).
/// 2. Classify and tag each item in order.
/// 3. Return the items with their sentiment tally.
///
/// An empty feed produces an empty, all-zero analysis rather than an error.
///
/// # Errors
///
/// Returns [`NewsError`] when the feed cannot be retrieved or parsed.
/// Classification problems never fail the pipeline.
pub async fn analyze_company<B, D>(
    fetcher: &FeedFetcher,
    aggregator: &Aggregator<B, D>,
    company: &str,
) -> Result<CompanyAnalysis, NewsError>
where
    B: ClassificationBackend,
    D: RetryDelay,
{
    let mut items = fetcher.fetch(company).await?;
    let tally = aggregator.analyze(&mut items).await;

    tracing::info!(
        company,
        items = items.len(),
        positive = tally.positive,
        negative = tally.negative,
        neutral = tally.neutral,
        "company analysis complete"
    );

    Ok(CompanyAnalysis {
        company: company.to_string(),
        tally,
        items,
    })
}
