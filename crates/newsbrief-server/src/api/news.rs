use axum::{
    extract::{Path, State},
    Extension, Json,
};
use newsbrief_news::{analyze_company, hindi_report, NewsItem, SentimentTally, SPEECH_LANGUAGE};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_news_error, map_speech_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct NewsData {
    pub company: String,
    pub articles: Vec<NewsItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct SentimentData {
    pub company: String,
    pub sentiment_summary: SentimentTally,
    pub articles: Vec<NewsItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct SpeechData {
    pub company: String,
    pub audio_file: String,
    pub report_text: String,
}

fn validate_company(request_id: &str, raw: &str) -> Result<String, ApiError> {
    let company = raw.trim();
    if company.is_empty() {
        return Err(ApiError::new(
            request_id,
            "validation_error",
            "company name must not be blank",
        ));
    }
    Ok(company.to_string())
}

pub(super) async fn get_news(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(company): Path<String>,
) -> Result<Json<ApiResponse<NewsData>>, ApiError> {
    let company = validate_company(&req_id.0, &company)?;

    let articles = state
        .fetcher
        .fetch(&company)
        .await
        .map_err(|e| map_news_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: NewsData { company, articles },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_sentiment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(company): Path<String>,
) -> Result<Json<ApiResponse<SentimentData>>, ApiError> {
    let company = validate_company(&req_id.0, &company)?;

    let analysis = analyze_company(&state.fetcher, state.aggregator.as_ref(), &company)
        .await
        .map_err(|e| map_news_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: SentimentData {
            company: analysis.company,
            sentiment_summary: analysis.tally,
            articles: analysis.items,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_tts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(company): Path<String>,
) -> Result<Json<ApiResponse<SpeechData>>, ApiError> {
    let company = validate_company(&req_id.0, &company)?;

    let analysis = analyze_company(&state.fetcher, state.aggregator.as_ref(), &company)
        .await
        .map_err(|e| map_news_error(req_id.0.clone(), &e))?;

    let report_text = hindi_report(&analysis.company, &analysis.tally, &analysis.items);
    let audio_path = state
        .speech
        .synthesize(&report_text, SPEECH_LANGUAGE)
        .await
        .map_err(|e| map_speech_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: SpeechData {
            company: analysis.company,
            audio_file: audio_path.display().to_string(),
            report_text,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
