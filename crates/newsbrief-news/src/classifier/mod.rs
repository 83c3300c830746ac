//! Sentiment classification over a pluggable inference backend.

mod inference;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ClassifierError;
use crate::types::{Sentiment, NO_SUMMARY};

pub use inference::InferenceClient;

/// Input is cut to this many chars before it reaches the backend.
pub const MAX_INPUT_CHARS: usize = 512;
/// Default total attempts per text, including the first.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default fixed wait between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// A single raw prediction from the classification backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub score: f32,
}

/// A pretrained text-classification capability.
///
/// Implementations must be safe to call concurrently once constructed.
pub trait ClassificationBackend: Send + Sync {
    fn predict(&self, text: &str)
        -> impl Future<Output = Result<Prediction, ClassifierError>> + Send;
}

impl<B: ClassificationBackend> ClassificationBackend for Arc<B> {
    fn predict(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Prediction, ClassifierError>> + Send {
        self.as_ref().predict(text)
    }
}

/// Wait between classification attempts.
pub trait RetryDelay: Send + Sync {
    fn wait(&self, delay: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

impl RetryDelay for TokioDelay {
    async fn wait(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Maps text to a [`Sentiment`], absorbing every backend failure.
///
/// Empty or placeholder input is `Neutral` without a backend call. Other
/// input is truncated to [`MAX_INPUT_CHARS`] and sent to the backend up to
/// `max_attempts` times with a fixed `retry_delay` between attempts; when
/// every attempt fails the result is `Neutral`.
pub struct SentimentClassifier<B, D = TokioDelay> {
    backend: B,
    delay: D,
    max_attempts: u32,
    retry_delay: Duration,
}

impl<B: ClassificationBackend> SentimentClassifier<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_retry(backend, TokioDelay, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}

impl<B: ClassificationBackend, D: RetryDelay> SentimentClassifier<B, D> {
    /// `max_attempts` is clamped to at least one.
    #[must_use]
    pub fn with_retry(backend: B, delay: D, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            backend,
            delay,
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    pub async fn classify(&self, text: &str) -> Sentiment {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == NO_SUMMARY {
            return Sentiment::Neutral;
        }

        let input = truncate_chars(text, MAX_INPUT_CHARS);

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.backend.predict(input).await {
                Ok(prediction) => return label_to_sentiment(&prediction.label),
                Err(err) if attempt < self.max_attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "sentiment classification failed, retrying"
                    );
                    self.delay.wait(self.retry_delay).await;
                }
                Err(err) => {
                    tracing::warn!(
                        attempts = attempt,
                        error = %err,
                        "sentiment classification exhausted retries, defaulting to neutral"
                    );
                    return Sentiment::Neutral;
                }
            }
        }
    }
}

/// Normalize a backend label onto the three-valued domain.
///
/// Accepts readable labels (`POSITIVE`, `neg`) and index-coded ones from
/// binary heads (`LABEL_1` positive, `LABEL_0` negative).
#[must_use]
pub fn label_to_sentiment(label: &str) -> Sentiment {
    match label.trim().to_ascii_uppercase().as_str() {
        "POSITIVE" | "POS" | "LABEL_1" => Sentiment::Positive,
        "NEGATIVE" | "NEG" | "LABEL_0" => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
