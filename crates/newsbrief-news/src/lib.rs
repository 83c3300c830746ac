//! Company news sentiment pipeline.
//!
//! Fetches recent items for a company from the news RSS search feed (with an
//! HTML search-page fallback), condenses each description into a short
//! summary, classifies sentiment through a pluggable inference backend, tags
//! topics, and tallies the result. The `speech` module turns a finished
//! analysis into a spoken Hindi report.

pub mod aggregate;
pub mod classifier;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod speech;
pub mod summary;
pub mod topics;
pub mod types;

pub use aggregate::Aggregator;
pub use classifier::{
    label_to_sentiment, ClassificationBackend, InferenceClient, Prediction, RetryDelay,
    SentimentClassifier, TokioDelay,
};
pub use error::{ClassifierError, NewsError, SpeechError};
pub use feed::{FeedFetcher, MAX_ITEMS};
pub use pipeline::analyze_company;
pub use speech::{hindi_report, SpeechClient, SPEECH_LANGUAGE};
pub use summary::summarize_description;
pub use topics::extract_topics;
pub use types::{
    CompanyAnalysis, ItemAnalysis, NewsItem, Sentiment, SentimentTally, NO_SUMMARY, NO_TITLE,
    UNKNOWN_DATE,
};
