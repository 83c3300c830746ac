//! Command handlers. Each prints one pretty JSON document to stdout.

use std::time::Duration;

use newsbrief_core::AppConfig;
use newsbrief_news::{
    analyze_company, hindi_report, Aggregator, FeedFetcher, InferenceClient, NewsItem,
    SentimentClassifier, SentimentTally, SpeechClient, TokioDelay, SPEECH_LANGUAGE,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct NewsOutput {
    pub company: String,
    pub articles: Vec<NewsItem>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeOutput {
    pub company: String,
    pub sentiment_summary: SentimentTally,
    pub articles: Vec<NewsItem>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SpeakOutput {
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,
    pub report_text: String,
}

/// Trimmed company name, rejecting blanks before any network call.
pub(crate) fn normalize_company(raw: &str) -> anyhow::Result<String> {
    let company = raw.trim();
    if company.is_empty() {
        anyhow::bail!("company name must not be blank");
    }
    Ok(company.to_string())
}

pub(crate) fn build_fetcher(config: &AppConfig) -> anyhow::Result<FeedFetcher> {
    Ok(FeedFetcher::with_base_url(
        &config.feed_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?)
}

pub(crate) fn build_aggregator(
    config: &AppConfig,
) -> anyhow::Result<Aggregator<InferenceClient>> {
    let classifier_url = config.require_classifier_url()?;
    let backend = InferenceClient::new(classifier_url, config.request_timeout_secs)?;
    Ok(Aggregator::new(SentimentClassifier::with_retry(
        backend,
        TokioDelay,
        config.classifier_max_attempts,
        Duration::from_millis(config.classifier_retry_delay_ms),
    )))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn run_news(config: &AppConfig, company: &str) -> anyhow::Result<()> {
    let company = normalize_company(company)?;
    let articles = build_fetcher(config)?.fetch(&company).await?;
    tracing::info!(company = %company, count = articles.len(), "fetched news items");
    print_json(&NewsOutput { company, articles })
}

pub(crate) async fn run_analyze(config: &AppConfig, company: &str) -> anyhow::Result<()> {
    let company = normalize_company(company)?;
    let fetcher = build_fetcher(config)?;
    let aggregator = build_aggregator(config)?;

    let analysis = analyze_company(&fetcher, &aggregator, &company).await?;

    print_json(&AnalyzeOutput {
        company: analysis.company,
        sentiment_summary: analysis.tally,
        articles: analysis.items,
    })
}

pub(crate) async fn run_speak(
    config: &AppConfig,
    company: &str,
    text_only: bool,
) -> anyhow::Result<()> {
    let company = normalize_company(company)?;
    let fetcher = build_fetcher(config)?;
    let aggregator = build_aggregator(config)?;

    let analysis = analyze_company(&fetcher, &aggregator, &company).await?;
    let report_text = hindi_report(&analysis.company, &analysis.tally, &analysis.items);

    let audio_file = if text_only {
        None
    } else {
        let speech = SpeechClient::with_base_url(
            &config.tts_base_url,
            config.audio_dir.clone(),
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        let path = speech.synthesize(&report_text, SPEECH_LANGUAGE).await?;
        Some(path.display().to_string())
    };

    print_json(&SpeakOutput {
        company: analysis.company,
        audio_file,
        report_text,
    })
}
