//! Per-item annotation and sentiment tallying.

use crate::classifier::{ClassificationBackend, RetryDelay, SentimentClassifier, TokioDelay};
use crate::topics::extract_topics;
use crate::types::{ItemAnalysis, NewsItem, SentimentTally, NO_SUMMARY, NO_TITLE};

/// Annotates news items with sentiment and topics.
pub struct Aggregator<B, D = TokioDelay> {
    classifier: SentimentClassifier<B, D>,
}

impl<B: ClassificationBackend, D: RetryDelay> Aggregator<B, D> {
    #[must_use]
    pub fn new(classifier: SentimentClassifier<B, D>) -> Self {
        Self { classifier }
    }

    /// Classify and tag every item in place, returning the sentiment tally.
    ///
    /// Items are processed one at a time in order; none are dropped or
    /// reordered, and each ends up with exactly one [`ItemAnalysis`].
    pub async fn analyze(&self, items: &mut [NewsItem]) -> SentimentTally {
        let mut tally = SentimentTally::default();

        for item in items.iter_mut() {
            let sentiment = self.classifier.classify(classification_text(item)).await;
            tally.record(sentiment);

            let combined = format!("{} {}", item.title, item.summary);
            let subject = item.title.split_whitespace().next().unwrap_or_default();
            let topics = extract_topics(&combined, subject);

            item.analysis = Some(ItemAnalysis { sentiment, topics });
        }

        tracing::debug!(
            items = items.len(),
            positive = tally.positive,
            negative = tally.negative,
            neutral = tally.neutral,
            "aggregated sentiment"
        );
        tally
    }
}

/// The summary, or the title when the summary is a placeholder and the title is real.
fn classification_text(item: &NewsItem) -> &str {
    if item.summary == NO_SUMMARY && item.title != NO_TITLE {
        &item.title
    } else {
        &item.summary
    }
}
