use serde::{Deserialize, Serialize};

pub mod provider;
pub mod startup_checks;
pub mod viewer;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub app: AppConfig,
    pub provider: ProviderConfig,
    pub viewer: ViewerConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Endpoint root of the image storage service; both provider routes
    /// hang off this.
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewerConfig {
    /// Locale for the long-form date labels on the date selector.
    pub locale: String,
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            app: AppConfig {
                name: "Shashinkan".to_string(),
                log_level: "info".to_string(),
            },
            provider: ProviderConfig {
                base_url: "http://localhost:8000".to_string(),
                request_timeout_secs: default_request_timeout_secs(),
            },
            viewer: ViewerConfig {
                locale: "th_TH".to_string(),
            },
        }
    }
}

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub viewer: viewer::SharedViewer,
    pub config: Config,
}

pub async fn create_app(config: Config) -> Result<Router, provider::ProviderError> {
    let store = Arc::new(provider::HttpImageStore::new(&config.provider)?);

    let viewer = Arc::new(viewer::GalleryViewer::new(
        config.viewer.clone(),
        store.clone() as Arc<dyn provider::MetadataProvider>,
        store as Arc<dyn provider::ContentProvider>,
    ));

    let app_state = AppState {
        viewer,
        config: config.clone(),
    };

    Ok(build_router(app_state))
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/search", axum::routing::post(viewer::search_handler))
        .route(
            "/api/gallery",
            axum::routing::get(viewer::gallery_snapshot_handler),
        )
        .route(
            "/api/gallery/select",
            axum::routing::post(viewer::select_group_handler),
        )
        .route(
            "/api/gallery/images",
            axum::routing::get(viewer::gallery_images_handler),
        )
        .route(
            "/api/gallery/content/{*path}",
            axum::routing::get(viewer::image_content_handler),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let method = request.method();
                    let uri = request.uri();
                    let matched_path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched_path| matched_path.as_str());

                    tracing::info_span!(
                        "http_request",
                        method = %method,
                        uri = %uri,
                        matched_path,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        let status = response.status();

                        tracing::info!(
                            target: "access_log",
                            status = %status,
                            latency_ms = %latency.as_millis(),
                            "response"
                        );
                    },
                ),
        )
        .with_state(app_state)
}
