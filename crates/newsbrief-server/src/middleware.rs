use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, RETRY_AFTER},
        HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

const API_KEYS_VAR: &str = "NEWSBRIEF_API_KEYS";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// API key auth settings used by middleware.
#[derive(Debug, Clone)]
pub struct AuthState {
    api_keys: Arc<HashSet<String>>,
    pub enabled: bool,
}

impl AuthState {
    /// Builds auth config from `NEWSBRIEF_API_KEYS` (comma-separated bearer tokens).
    ///
    /// In development, empty/missing keys disable auth for local iteration.
    /// In non-development envs, empty/missing keys fail startup.
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var(API_KEYS_VAR).unwrap_or_default();
        Self::from_raw(&raw, is_development)
    }

    fn from_raw(raw: &str, is_development: bool) -> anyhow::Result<Self> {
        let state = Self::from_keys(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned),
        );

        if !state.enabled {
            if is_development {
                tracing::warn!(
                    "{API_KEYS_VAR} not set; bearer auth disabled in development environment"
                );
                return Ok(state);
            }

            anyhow::bail!(
                "{API_KEYS_VAR} is required outside development; provide comma-separated bearer tokens"
            );
        }

        Ok(state)
    }

    /// Auth is enabled exactly when at least one key is given.
    pub fn from_keys(keys: impl IntoIterator<Item = String>) -> Self {
        let keys: HashSet<String> = keys.into_iter().collect();
        Self {
            enabled: !keys.is_empty(),
            api_keys: Arc::new(keys),
        }
    }

    fn allows(&self, token: &str) -> bool {
        self.api_keys.contains(token)
    }
}

/// Request count inside the current fixed window.
#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

impl RateLimitWindow {
    /// Count one request at `now`, or return how long until the window resets.
    fn admit(
        &mut self,
        now: Instant,
        max_requests: usize,
        length: Duration,
    ) -> Result<(), Duration> {
        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed >= length {
            self.started_at = now;
            self.count = 0;
        }

        if self.count >= max_requests {
            return Err(length.saturating_sub(now.saturating_duration_since(self.started_at)));
        }
        self.count += 1;
        Ok(())
    }
}

/// One fixed window shared by every caller of the protected routes.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    current: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            current: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }
}

#[derive(Debug, Serialize)]
struct RejectionBody {
    error: Rejection,
}

#[derive(Debug, Serialize)]
struct Rejection {
    code: &'static str,
    message: &'static str,
}

/// Error response in the same `{ "error": { code, message } }` shape the
/// handlers use.
fn reject(status: StatusCode, code: &'static str, message: &'static str) -> Response {
    (
        status,
        Json(RejectionBody {
            error: Rejection { code, message },
        }),
    )
        .into_response()
}

/// Use the caller's `x-request-id` or mint a v4 UUID, expose it to handlers
/// as [`RequestId`], and echo it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    res
}

/// Reject requests without a known bearer token while auth is enabled.
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }

    let token = extract_bearer_token(req.headers().get(AUTHORIZATION));

    match token {
        Some(token) if auth.allows(token) => next.run(req).await,
        _ => {
            tracing::debug!(
                path = %req.uri().path(),
                "rejected request without valid bearer token"
            );
            reject(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "missing or invalid bearer token",
            )
        }
    }
}

/// Admit at most `max_requests` per fixed window across all callers.
///
/// Rejections carry `retry-after` with the whole seconds left in the window.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let admitted = rate_limit.current.lock().await.admit(
        Instant::now(),
        rate_limit.max_requests,
        rate_limit.window,
    );

    if let Err(wait) = admitted {
        let retry_after = wait.as_secs().max(1);
        tracing::warn!(retry_after_secs = retry_after, "rate limit exceeded");
        let mut res = reject(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "rate limit exceeded",
        );
        res.headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from(retry_after));
        return res;
    }

    next.run(req).await
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}
