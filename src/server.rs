//! Panel simulator HTTP server.
//!
//! Plays the picture frame's side of the upload contract so the whole
//! pipeline can be exercised without hardware.

use axum::{
    http::header::CONNECTION,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::services::PanelStore;

/// Build the simulator router.
///
/// Used by both `inkframe simulate` and the integration tests. Responses
/// carry `Connection: close`, as the frame's embedded web server does.
pub fn build_router(store: Arc<PanelStore>) -> Router {
    Router::new()
        // Device contract
        .route("/upload", post(api::handle_upload))
        // Inspection
        .route("/status", get(api::handle_status))
        .route("/panel.png", get(api::handle_panel_png))
        .route("/health", get(|| async { "OK" }))
        .with_state(store)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            CONNECTION,
            axum::http::HeaderValue::from_static("close"),
        ))
}
