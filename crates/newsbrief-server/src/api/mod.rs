mod news;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use newsbrief_news::{Aggregator, FeedFetcher, InferenceClient, SpeechClient};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

/// Long-lived collaborators shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<FeedFetcher>,
    pub aggregator: Arc<Aggregator<InferenceClient>>,
    pub speech: Arc<SpeechClient>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_news_error(request_id: String, error: &newsbrief_news::NewsError) -> ApiError {
    tracing::error!(error = %error, "news feed request failed");
    ApiError::new(request_id, "upstream_error", "news feed unavailable")
}

pub(super) fn map_speech_error(request_id: String, error: &newsbrief_news::SpeechError) -> ApiError {
    tracing::error!(error = %error, "speech synthesis failed");
    ApiError::new(request_id, "internal_error", "speech synthesis failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/news/{company}", get(news::get_news))
        .route("/api/v1/sentiment/{company}", get(news::get_sentiment))
        .route("/api/v1/tts/{company}", get(news::get_tts))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

/// Analysis runs hit two remote services per item, so the default budget is
/// lower than a plain read API would use.
pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(30, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use newsbrief_news::{SentimentClassifier, TokioDelay};
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ACME_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Acme - News</title>
<item>
  <title>Acme Reports Record Profit</title>
  <link>https://news.example.com/a</link>
  <description><![CDATA[<p>Acme Corp posted strong quarterly revenue growth.</p>]]></description>
  <pubDate>Mon, 01 Jan 2024 10:00:00 GMT</pubDate>
</item>
<item>
  <title>Acme Opens Plant</title>
  <link>https://news.example.com/b</link>
  <description>Acme has opened a new plant near Pune this week.</description>
  <pubDate>Tue, 02 Jan 2024 10:00:00 GMT</pubDate>
</item>
</channel></rss>"#;

    struct Upstreams {
        feed: MockServer,
        model: MockServer,
        tts: MockServer,
        audio_dir: std::path::PathBuf,
    }

    async fn upstreams(name: &str) -> Upstreams {
        let feed = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rss/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ACME_RSS))
            .mount(&feed)
            .await;

        let model = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"label": "POSITIVE", "score": 0.95}])),
            )
            .mount(&model)
            .await;

        let tts = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3".to_vec()))
            .mount(&tts)
            .await;

        let audio_dir = std::env::temp_dir().join(format!(
            "newsbrief-server-{name}-{}",
            std::process::id()
        ));

        Upstreams {
            feed,
            model,
            tts,
            audio_dir,
        }
    }

    fn test_state(up: &Upstreams) -> AppState {
        let fetcher =
            FeedFetcher::with_base_url(&up.feed.uri(), 5, "newsbrief-test/0.1").expect("fetcher");
        let backend = InferenceClient::new(&up.model.uri(), 5).expect("inference client");
        let classifier = SentimentClassifier::with_retry(backend, TokioDelay, 1, Duration::ZERO);
        let speech =
            SpeechClient::with_base_url(&up.tts.uri(), &up.audio_dir, 5, "newsbrief-test/0.1")
                .expect("speech client");
        AppState {
            fetcher: Arc::new(fetcher),
            aggregator: Arc::new(Aggregator::new(classifier)),
            speech: Arc::new(speech),
        }
    }

    fn open_auth() -> AuthState {
        AuthState::from_keys(std::iter::empty::<String>())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&body).expect("json parse");
        (status, json)
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_upstream_error_maps_to_bad_gateway() {
        let response = ApiError::new("req-1", "upstream_error", "feed down").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn health_is_public_and_echoes_request_id() {
        let up = upstreams("health").await;
        let app = build_app(
            test_state(&up),
            AuthState::from_keys(["secret".to_string()]),
            default_rate_limit_state(),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-health")
        );
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["meta"]["request_id"], "req-health");
    }

    #[tokio::test]
    async fn news_returns_unannotated_articles() {
        let up = upstreams("news").await;
        let app = build_app(test_state(&up), open_auth(), default_rate_limit_state());

        let (status, json) = get_json(app, "/api/v1/news/Acme").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["company"], "Acme");
        let articles = json["data"]["articles"].as_array().expect("articles");
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0]["title"], "Acme Reports Record Profit");
        assert_eq!(
            articles[0]["summary"],
            "Acme Corp posted strong quarterly revenue growth."
        );
        assert!(articles[0].get("sentiment").is_none());
    }

    #[tokio::test]
    async fn sentiment_returns_tally_and_annotated_articles() {
        let up = upstreams("sentiment").await;
        let app = build_app(test_state(&up), open_auth(), default_rate_limit_state());

        let (status, json) = get_json(app, "/api/v1/sentiment/Acme").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["data"]["sentiment_summary"],
            json!({"Positive": 2, "Negative": 0, "Neutral": 0})
        );
        let first = &json["data"]["articles"][0];
        assert_eq!(first["sentiment"], "Positive");
        let topics = first["topics"].as_array().expect("topics");
        assert!(topics.iter().any(|t| t == "Profit"));
    }

    #[tokio::test]
    async fn tts_writes_audio_and_returns_report() {
        let up = upstreams("tts").await;
        let app = build_app(test_state(&up), open_auth(), default_rate_limit_state());

        let (status, json) = get_json(app, "/api/v1/tts/Acme").await;

        assert_eq!(status, StatusCode::OK);
        let audio_file = json["data"]["audio_file"].as_str().expect("audio path");
        assert!(audio_file.ends_with(".mp3"));
        assert!(std::path::Path::new(audio_file).exists());
        let report = json["data"]["report_text"].as_str().expect("report text");
        assert!(report.contains("कंपनी Acme"));
        assert!(report.contains("अधिकतर सकारात्मक"));
        let _ = std::fs::remove_dir_all(&up.audio_dir);
    }

    #[tokio::test]
    async fn blank_company_is_a_validation_error() {
        let up = upstreams("blank").await;
        let app = build_app(test_state(&up), open_auth(), default_rate_limit_state());

        let (status, json) = get_json(app, "/api/v1/sentiment/%20%20").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn feed_failure_maps_to_bad_gateway() {
        let up = upstreams("upstream").await;
        up.feed.reset().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&up.feed)
            .await;
        let app = build_app(test_state(&up), open_auth(), default_rate_limit_state());

        let (status, json) = get_json(app, "/api/v1/news/Acme").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["error"]["code"], "upstream_error");
    }

    #[tokio::test]
    async fn protected_routes_require_bearer_token_when_keys_configured() {
        let up = upstreams("auth").await;
        let state = test_state(&up);
        let auth = AuthState::from_keys(["secret".to_string()]);

        let (status, json) = get_json(
            build_app(state.clone(), auth.clone(), default_rate_limit_state()),
            "/api/v1/news/Acme",
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["error"]["code"], "unauthorized");

        let response = build_app(state, auth, default_rate_limit_state())
            .oneshot(
                Request::builder()
                    .uri("/api/v1/news/Acme")
                    .header("authorization", "Bearer secret")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rate_limit_rejects_requests_over_budget() {
        let up = upstreams("ratelimit").await;
        let app = build_app(
            test_state(&up),
            open_auth(),
            RateLimitState::new(1, Duration::from_secs(60)),
        );

        let (first, _) = get_json(app.clone(), "/api/v1/news/Acme").await;
        let (second, json) = get_json(app, "/api/v1/news/Acme").await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["error"]["code"], "rate_limited");
    }
}
