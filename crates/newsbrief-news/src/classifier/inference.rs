//! HTTP client for a hosted sequence-classification model.
//!
//! Speaks the `/predict` shape served by Text Embeddings Inference and the
//! Hugging Face inference API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ClassificationBackend, Prediction};
use crate::error::ClassifierError;

/// Inference server client. Build once and share.
pub struct InferenceClient {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    inputs: &'a str,
    truncate: bool,
}

/// Response bodies seen in the wild: a flat label list, a list nested per
/// input, or a single prediction object.
#[derive(Deserialize)]
#[serde(untagged)]
enum PredictResponse {
    Flat(Vec<Prediction>),
    Nested(Vec<Vec<Prediction>>),
    Single(Prediction),
}

impl PredictResponse {
    fn into_best(self) -> Option<Prediction> {
        let candidates = match self {
            PredictResponse::Flat(list) => list,
            PredictResponse::Nested(lists) => lists.into_iter().flatten().collect(),
            PredictResponse::Single(one) => vec![one],
        };
        candidates
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
    }
}

impl InferenceClient {
    /// Create a client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: format!("{}/predict", base_url.trim_end_matches('/')),
        })
    }
}

impl ClassificationBackend for InferenceClient {
    async fn predict(&self, text: &str) -> Result<Prediction, ClassifierError> {
        let request = PredictRequest {
            inputs: text,
            truncate: true,
        };
        let response = self.client.post(&self.url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(ClassifierError::UnexpectedStatus(response.status().as_u16()));
        }

        let body: PredictResponse = response
            .json()
            .await
            .map_err(|e| ClassifierError::Decode(e.to_string()))?;

        body.into_best().ok_or(ClassifierError::EmptyPrediction)
    }
}
