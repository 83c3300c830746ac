mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use newsbrief_news::{
    Aggregator, FeedFetcher, InferenceClient, SentimentClassifier, SpeechClient, TokioDelay,
};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = newsbrief_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let fetcher = FeedFetcher::with_base_url(
        &config.feed_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let classifier_url = config.require_classifier_url()?;
    let backend = InferenceClient::new(classifier_url, config.request_timeout_secs)?;
    let classifier = SentimentClassifier::with_retry(
        backend,
        TokioDelay,
        config.classifier_max_attempts,
        Duration::from_millis(config.classifier_retry_delay_ms),
    );
    let speech = SpeechClient::with_base_url(
        &config.tts_base_url,
        config.audio_dir.clone(),
        config.request_timeout_secs,
        &config.user_agent,
    )?;

    let state = AppState {
        fetcher: Arc::new(fetcher),
        aggregator: Arc::new(Aggregator::new(classifier)),
        speech: Arc::new(speech),
    };

    let auth = AuthState::from_env(matches!(config.env, newsbrief_core::Environment::Development))?;
    let app = build_app(state, auth, default_rate_limit_state());

    tracing::info!(
        bind_addr = %config.bind_addr,
        env = %config.env,
        classifier_url = %classifier_url,
        "starting newsbrief server"
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
