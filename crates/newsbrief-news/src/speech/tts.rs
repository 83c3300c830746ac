//! Text-to-speech over the public translate TTS endpoint.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, Url};
use sha2::{Digest, Sha256};

use crate::error::SpeechError;

const DEFAULT_BASE_URL: &str = "https://translate.google.com/";

/// Longest text the endpoint accepts per request, in chars.
const MAX_CHUNK_CHARS: usize = 100;

/// Hex chars of the content hash used in audio file names.
const FILE_STEM_LEN: usize = 16;

/// Synthesizes speech and writes it as an MP3 under an output directory.
pub struct SpeechClient {
    client: Client,
    base_url: Url,
    output_dir: PathBuf,
}

impl SpeechClient {
    /// Creates a client against the production TTS origin.
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        output_dir: impl Into<PathBuf>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SpeechError> {
        Self::with_base_url(DEFAULT_BASE_URL, output_dir, timeout_secs, user_agent)
    }

    /// Creates a client against a custom origin (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SpeechError::Http`] if the client cannot be built, or
    /// [`SpeechError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        output_dir: impl Into<PathBuf>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| SpeechError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            output_dir: output_dir.into(),
        })
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Speak `text` in `language` and return the path of the written MP3.
    ///
    /// The text is sent in chunks of at most 100 chars and the returned
    /// audio segments are concatenated in order. The file name is derived
    /// from the text and language, so repeating a request overwrites the
    /// same file.
    ///
    /// # Errors
    ///
    /// - [`SpeechError::EmptyText`] when `text` is blank.
    /// - [`SpeechError::Http`] / [`SpeechError::UnexpectedStatus`] when a
    ///   chunk request fails.
    /// - [`SpeechError::Io`] when the output file cannot be written.
    pub async fn synthesize(&self, text: &str, language: &str) -> Result<PathBuf, SpeechError> {
        let chunks = split_chunks(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let endpoint = self
            .base_url
            .join("translate_tts")
            .map_err(|e| SpeechError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;

        let total = chunks.len().to_string();
        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let response = self
                .client
                .get(endpoint.clone())
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", language),
                    ("q", chunk.as_str()),
                    ("total", total.as_str()),
                    ("idx", idx.to_string().as_str()),
                    ("textlen", chunk.chars().count().to_string().as_str()),
                ])
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(SpeechError::UnexpectedStatus {
                    status: status.as_u16(),
                    chunk: idx,
                });
            }
            audio.extend_from_slice(&response.bytes().await?);
        }

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(audio_file_name(text, language));
        tokio::fs::write(&path, &audio).await?;

        tracing::info!(
            path = %path.display(),
            chunks = chunks.len(),
            bytes = audio.len(),
            "wrote speech audio"
        );
        Ok(path)
    }
}

/// `<first 16 hex chars of sha256(language:text)>.mp3`
fn audio_file_name(text: &str, language: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(format!("{language}:{text}").as_bytes()));
    format!("{}.mp3", &digest[..FILE_STEM_LEN])
}

/// Greedily pack whitespace-separated words into chunks of at most
/// `max_chars` chars. A single word longer than that is split mid-word.
fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
