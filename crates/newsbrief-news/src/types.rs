use serde::{Deserialize, Serialize};

/// Stand-in title for feed items that carry none.
pub const NO_TITLE: &str = "No Title";
/// Stand-in summary for feed items without a usable description.
pub const NO_SUMMARY: &str = "No Summary Available";
/// Stand-in publication date for feed items without one.
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Closed sentiment domain produced by classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "Positive"),
            Sentiment::Negative => write!(f, "Negative"),
            Sentiment::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Annotations attached to a [`NewsItem`] by the aggregation pass.
///
/// Sentiment and topics live in one value so an item is either fully
/// annotated or not annotated at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAnalysis {
    pub sentiment: Sentiment,
    pub topics: Vec<String>,
}

/// One news entry retrieved for a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub summary: String,
    /// Source URL. Empty when the feed did not provide one.
    pub link: String,
    /// Publication timestamp exactly as the source formatted it.
    pub date: String,
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<ItemAnalysis>,
}

impl NewsItem {
    /// Build an un-analyzed item, substituting placeholders for absent fields.
    #[must_use]
    pub fn new(
        title: Option<String>,
        summary: Option<String>,
        link: Option<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            title: non_blank(title).unwrap_or_else(|| NO_TITLE.to_string()),
            summary: non_blank(summary).unwrap_or_else(|| NO_SUMMARY.to_string()),
            link: link.map(|l| l.trim().to_string()).unwrap_or_default(),
            date: non_blank(date).unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            analysis: None,
        }
    }

    #[must_use]
    pub fn sentiment(&self) -> Option<Sentiment> {
        self.analysis.as_ref().map(|a| a.sentiment)
    }

    #[must_use]
    pub fn topics(&self) -> Option<&[String]> {
        self.analysis.as_ref().map(|a| a.topics.as_slice())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Per-label item counts for one analysis run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentTally {
    #[serde(rename = "Positive")]
    pub positive: usize,
    #[serde(rename = "Negative")]
    pub negative: usize,
    #[serde(rename = "Neutral")]
    pub neutral: usize,
}

impl SentimentTally {
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }

    #[must_use]
    pub fn count(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// The label that strictly outnumbers both others, if any.
    ///
    /// Only `Positive` or `Negative` can dominate; ties and neutral-heavy
    /// tallies read as mixed and return `None`.
    #[must_use]
    pub fn dominant(&self) -> Option<Sentiment> {
        if self.positive > self.negative && self.positive > self.neutral {
            Some(Sentiment::Positive)
        } else if self.negative > self.positive && self.negative > self.neutral {
            Some(Sentiment::Negative)
        } else {
            None
        }
    }
}

/// Result of running the full pipeline for one company.
#[derive(Debug, Clone, Serialize)]
pub struct CompanyAnalysis {
    pub company: String,
    pub tally: SentimentTally,
    pub items: Vec<NewsItem>,
}
