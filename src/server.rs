// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::config::FeedConfig;
use crate::http::HttpClient;
use crate::pipeline::{FeedReport, generate_feed};
use crate::progress::TracingReporter;

/// Route that triggers a rebuild
pub const REBUILD_PATH: &str = "/rebuild-feed";

/// Shared state of the rebuild endpoint
pub struct AppState<C> {
    client: C,
    config: FeedConfig,
    /// Held for a whole run so overlapping triggers never race on the output file
    run_lock: Mutex<()>,
}

impl<C: HttpClient> AppState<C> {
    pub fn new(client: C, config: FeedConfig) -> Self {
        Self {
            client,
            config,
            run_lock: Mutex::new(()),
        }
    }
}

#[derive(Debug, Serialize)]
struct RebuildResponse {
    message: &'static str,
    #[serde(flatten)]
    report: FeedReport,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router<C: HttpClient + 'static>(state: AppState<C>) -> Router {
    Router::new()
        .route(
            REBUILD_PATH,
            post(rebuild_feed::<C>).fallback(method_not_allowed),
        )
        .with_state(Arc::new(state))
}

/// Bind `addr` and serve the rebuild endpoint until the process stops
pub async fn serve<C: HttpClient + 'static>(
    addr: SocketAddr,
    state: AppState<C>,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, path = REBUILD_PATH, "listening for rebuild triggers");
    axum::serve(listener, router(state)).await
}

async fn rebuild_feed<C: HttpClient + 'static>(State(state): State<Arc<AppState<C>>>) -> Response {
    let _run = state.run_lock.lock().await;

    match generate_feed(&state.client, &state.config, TracingReporter::shared()).await {
        Ok(report) => {
            tracing::info!(episodes = report.episodes, "feed regenerated");
            (
                StatusCode::OK,
                Json(RebuildResponse {
                    message: "Feed regenerated successfully",
                    report,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "feed generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Feed generation failed: {e}"),
                }),
            )
                .into_response()
        }
    }
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse {
            error: "Only POST allowed".to_string(),
        }),
    )
}
