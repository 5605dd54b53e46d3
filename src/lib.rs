use std::time::Duration;

use axum::{
    Router,
    extract::{DefaultBodyLimit, MatchedPath},
    response::Response,
    routing::{get, post},
};
use http::{HeaderValue, Method, header};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::field::Empty;

use crate::{config::Config, endpoints::*, state::AppState};

pub mod classification;
pub mod config;
pub mod data;
pub mod endpoints;
pub mod error;
pub mod services;
pub mod state;
pub mod statement_parsing;

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let routes = Router::new()
        .route("/upload", post(upload::upload))
        .route("/summary", get(reports::summary))
        .route("/daily_summary", get(reports::daily_summary))
        .route("/monthly_summary", get(reports::monthly_summary))
        .route("/check_overbudget", get(reports::check_overbudget))
        .route("/advice", get(reports::advice))
        .route("/transaction_counts", get(reports::transaction_counts))
        .route("/expenses", get(records::expenses))
        .route("/transfers", get(records::transfers))
        .route("/health", get(health_check));

    #[cfg(feature = "docs")]
    let routes = routes.route("/openapi.json", get(openapi));

    routes
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors(&config))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &http::Request<axum::body::Body>| {
                    let matched_path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or("{unknown}");

                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        route = matched_path,
                        status = Empty
                    )
                })
                .on_response(|response: &Response, latency: Duration, span: &tracing::Span| {
                    span.record("status", response.status().as_u16());
                    tracing::debug!(?latency, "finished request");
                }),
        )
}

#[tracing::instrument(skip(config))]
fn cors(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::OPTIONS, Method::HEAD, Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ACCEPT_ENCODING,
            header::ACCEPT_LANGUAGE,
        ]);

    let Some(front_base_url) = &config.front_base_url else {
        return layer;
    };

    match front_base_url.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(err) => {
            tracing::warn!(%front_base_url, "ignoring invalid allow origin: {}", err);
            layer
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
