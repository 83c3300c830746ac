use thiserror::Error;

/// Failures while retrieving or parsing the news feed.
#[derive(Debug, Error)]
pub enum NewsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid feed URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Failures from the text-classification backend.
///
/// These never leave [`crate::SentimentClassifier`]; they drive its retry loop.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("classifier returned status {0}")]
    UnexpectedStatus(u16),

    #[error("classifier response decode error: {0}")]
    Decode(String),

    #[error("classifier returned no predictions")]
    EmptyPrediction,
}

/// Failures while synthesizing the spoken report.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("speech endpoint returned status {status} for chunk {chunk}")]
    UnexpectedStatus { status: u16, chunk: usize },

    #[error("I/O error writing audio: {0}")]
    Io(#[from] std::io::Error),

    #[error("nothing to synthesize")]
    EmptyText,

    #[error("invalid speech URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
