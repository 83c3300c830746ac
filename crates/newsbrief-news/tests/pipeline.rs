//! End-to-end analysis against mocked feed and classifier servers.

use std::time::Duration;

use newsbrief_news::{
    analyze_company, Aggregator, FeedFetcher, InferenceClient, RetryDelay, Sentiment,
    SentimentClassifier, SentimentTally,
};
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct NoDelay;

impl RetryDelay for NoDelay {
    async fn wait(&self, _delay: Duration) {}
}

const ACME_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>"Acme" - News</title>
<item>
  <title>Acme Reports Record Profit</title>
  <link>https://news.example.com/a</link>
  <description><![CDATA[<a href="https://x">Acme Corp posted strong quarterly revenue growth.</a>&nbsp;&nbsp;<font>Economic Times</font>]]></description>
  <pubDate>Mon, 01 Jan 2024 10:00:00 GMT</pubDate>
</item>
<item>
  <title>Acme Faces Lawsuit</title>
  <link>https://news.example.com/b</link>
  <description>A lawsuit was filed against Acme over its product labelling. More to follow.</description>
  <pubDate>Tue, 02 Jan 2024 10:00:00 GMT</pubDate>
</item>
<item>
  <title>Acme Moves Office</title>
  <link>https://news.example.com/c</link>
  <pubDate>Wed, 03 Jan 2024 10:00:00 GMT</pubDate>
</item>
</channel></rss>"#;

async fn mount_classifier(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_string_contains("revenue growth"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"label": "POSITIVE", "score": 0.97}])),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_string_contains("lawsuit"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"label": "NEGATIVE", "score": 0.91}])),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .and(body_string_contains("Moves Office"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(server)
        .await;
}

#[tokio::test]
async fn acme_feed_is_fetched_classified_and_tallied() {
    let feed = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ACME_RSS))
        .expect(1)
        .mount(&feed)
        .await;

    let model = MockServer::start().await;
    mount_classifier(&model).await;

    let fetcher = FeedFetcher::with_base_url(&feed.uri(), 5, "newsbrief-test/0.1").expect("fetcher");
    let backend = InferenceClient::new(&model.uri(), 5).expect("inference client");
    let aggregator = Aggregator::new(SentimentClassifier::with_retry(
        backend,
        NoDelay,
        3,
        Duration::ZERO,
    ));

    let analysis = analyze_company(&fetcher, &aggregator, "Acme")
        .await
        .expect("analysis should succeed");

    assert_eq!(analysis.company, "Acme");
    assert_eq!(
        analysis.tally,
        SentimentTally {
            positive: 1,
            negative: 1,
            neutral: 1,
        }
    );
    assert_eq!(analysis.tally.dominant(), None);

    let first = &analysis.items[0];
    assert_eq!(first.summary, "Acme Corp posted strong quarterly revenue growth.");
    assert_eq!(first.sentiment(), Some(Sentiment::Positive));
    let topics = first.topics().expect("annotated");
    assert!(topics.iter().any(|t| t == "Profit"));
    assert!(topics.iter().any(|t| t == "Revenue"));

    assert_eq!(analysis.items[1].sentiment(), Some(Sentiment::Negative));
    // Classifier failed on every attempt for the title-only item.
    assert_eq!(analysis.items[2].sentiment(), Some(Sentiment::Neutral));
    assert!(analysis.items.iter().all(|i| i.analysis.is_some()));
}

#[tokio::test]
async fn empty_feed_produces_empty_analysis() {
    let feed = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rss/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<rss version="2.0"><channel></channel></rss>"#),
        )
        .mount(&feed)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&feed)
        .await;

    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&model)
        .await;

    let fetcher = FeedFetcher::with_base_url(&feed.uri(), 5, "newsbrief-test/0.1").expect("fetcher");
    let backend = InferenceClient::new(&model.uri(), 5).expect("inference client");
    let aggregator = Aggregator::new(SentimentClassifier::with_retry(
        backend,
        NoDelay,
        3,
        Duration::ZERO,
    ));

    let analysis = analyze_company(&fetcher, &aggregator, "Nobody")
        .await
        .expect("empty feed is not an error");

    assert!(analysis.items.is_empty());
    assert_eq!(analysis.tally.total(), 0);
}
