use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    asset_detail, create_watch, get_watch, health_check, list_watches, AppState,
};
use crate::notify::Notifier;
use crate::price::{CoinGeckoSource, PriceSource};
use crate::register::RegistrationService;
use crate::sweep::Sweeper;
use crate::watch::WatchStore;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds between sweeps over the watch registry
    pub sweep_interval_secs: u64,
    /// Timeout for price source and webhook calls
    pub http_timeout_secs: u64,
    /// Base URL of the quote provider
    pub price_api_url: String,
    /// Webhook URL for notifications; None routes them to the log
    pub notify_webhook: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            sweep_interval_secs: 60,
            http_timeout_secs: 10,
            price_api_url: crate::price::coingecko::COINGECKO_API_URL.to_string(),
            notify_webhook: None,
        }
    }
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Watch lifecycle
        .route("/watches", post(create_watch))
        .route("/watches", get(list_watches))
        .route("/watches/:id", get(get_watch))
        // Asset detail proxy
        .route("/assets/:id", get(asset_detail))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the HTTP server and the sweep worker
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let timeout = Duration::from_secs(config.http_timeout_secs);

    let store = Arc::new(WatchStore::new());
    let prices: Arc<dyn PriceSource> =
        Arc::new(CoinGeckoSource::with_base_url(&config.price_api_url, timeout));

    let notifier: Arc<dyn Notifier> = match &config.notify_webhook {
        Some(url) => {
            tracing::info!(url = %url, "Notifications routed to webhook");
            Arc::new(crate::notify::WebhookNotifier::new(url, timeout))
        }
        None => {
            tracing::info!("No webhook configured; notifications go to the log");
            Arc::new(crate::notify::LogNotifier)
        }
    };

    let state = Arc::new(AppState {
        store: Arc::clone(&store),
        registration: RegistrationService::new(Arc::clone(&store), Arc::clone(&notifier)),
        prices: Arc::clone(&prices),
    });

    // Start the sweep worker
    let sweeper = Arc::new(Sweeper::new(
        store,
        prices,
        notifier,
        Duration::from_secs(config.sweep_interval_secs),
    ));
    let sweeper_handle = Arc::clone(&sweeper).start();

    // Build router
    let app = build_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Starting pricewatch server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(Arc::clone(&sweeper)))
        .await?;

    // An in-flight sweep may be abandoned here; pending watches are simply
    // re-evaluated after the next startup.
    sweeper_handle.abort();

    tracing::info!("pricewatch server stopped");
    Ok(())
}

async fn shutdown_signal(sweeper: Arc<Sweeper>) {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");

    tracing::info!("Shutdown signal received, stopping sweep worker...");
    sweeper.stop();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{LogNotifier, NotifyError};
    use crate::price::PriceError;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    struct StubPrices {
        detail_fails: bool,
    }

    #[async_trait::async_trait]
    impl PriceSource for StubPrices {
        async fn quote(&self, _asset_id: &str) -> Result<Option<f64>, PriceError> {
            Ok(Some(100.0))
        }

        async fn detail(&self, asset_id: &str) -> Result<serde_json::Value, PriceError> {
            if self.detail_fails {
                return Err(PriceError::Status(500));
            }
            Ok(serde_json::json!({ "id": asset_id, "name": "Bitcoin" }))
        }
    }

    struct FailingNotifier;

    #[async_trait::async_trait]
    impl Notifier for FailingNotifier {
        async fn send(&self, _: &str, _: &str, _: &str) -> Result<(), NotifyError> {
            Err(NotifyError::Webhook("down".to_string()))
        }
    }

    fn create_test_app_with(
        notifier: Arc<dyn Notifier>,
        detail_fails: bool,
    ) -> (Arc<WatchStore>, Router) {
        let store = Arc::new(WatchStore::new());
        let state = Arc::new(AppState {
            store: Arc::clone(&store),
            registration: RegistrationService::new(Arc::clone(&store), notifier),
            prices: Arc::new(StubPrices { detail_fails }),
        });
        (store, build_router(state))
    }

    fn create_test_app() -> (Arc<WatchStore>, Router) {
        create_test_app_with(Arc::new(LogNotifier), false)
    }

    fn post_watch(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/watches")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (_, app) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_watch_accepted_and_confirmed() {
        let (store, app) = create_test_app();

        let response = app
            .oneshot(post_watch(serde_json::json!({
                "asset_id": "bitcoin",
                "mode": "up",
                "up_limit": 100000,
                "recipient": "a@x.com"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        assert_eq!(body["confirmation_sent"], serde_json::json!(true));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_create_watch_partial_success_on_confirmation_failure() {
        let (store, app) = create_test_app_with(Arc::new(FailingNotifier), false);

        let response = app
            .oneshot(post_watch(serde_json::json!({
                "asset_id": "eth",
                "mode": "both",
                "up_limit": 5000,
                "down_limit": 1000,
                "recipient": "b@x.com"
            })))
            .await
            .unwrap();

        // Accepted despite the failed confirmation; the watch stays active
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        assert_eq!(body["confirmation_sent"], serde_json::json!(false));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_create_watch_rejects_missing_limit() {
        let (store, app) = create_test_app();

        let response = app
            .oneshot(post_watch(serde_json::json!({
                "asset_id": "bitcoin",
                "mode": "up",
                "recipient": "a@x.com"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_list_and_get_watches() {
        let (_, app) = create_test_app();

        let response = app
            .clone()
            .oneshot(post_watch(serde_json::json!({
                "asset_id": "bitcoin",
                "mode": "down",
                "down_limit": 50000,
                "recipient": "a@x.com"
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/watches")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["watches"].as_array().unwrap().len(), 1);
        assert_eq!(body["watches"][0]["notified"], serde_json::json!(false));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/watches/0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["asset_id"], serde_json::json!("bitcoin"));
    }

    #[tokio::test]
    async fn test_get_watch_not_found() {
        let (_, app) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/watches/99")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_asset_detail_proxy() {
        let (_, app) = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/assets/bitcoin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["id"], serde_json::json!("bitcoin"));
    }

    #[tokio::test]
    async fn test_asset_detail_upstream_failure() {
        let (_, app) = create_test_app_with(Arc::new(LogNotifier), true);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/assets/bitcoin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
