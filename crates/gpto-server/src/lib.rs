//! # gpto-server
//!
//! HTTP surface for the audit engine:
//! - `POST /api/audit` with `{"url": "..."}` returns the audit report
//! - `GET /healthz` returns `ok`
//!
//! Every failure, including a malformed request body, is a `400` with
//! `{"error": "..."}`.

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use gpto_core::{AuditConfig, AuditError, AuditRequest, Auditor, ErrorBody};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared, immutable per-process state
pub type AppState = Arc<Auditor>;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/audit", post(audit_handler))
        .route("/healthz", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(addr: SocketAddr, config: AuditConfig) -> Result<()> {
    let auditor = Auditor::new(config).context("Failed to set up auditor")?;
    let app = create_router(Arc::new(auditor));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn audit_handler(
    State(auditor): State<AppState>,
    payload: std::result::Result<Json<AuditRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected audit request: {}", rejection.body_text());
            return error(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    match auditor.run(&request).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => {
            warn!("Audit failed for {:?}: {}", request.url, err);
            error(status_for(&err), err.to_string())
        }
    }
}

fn status_for(err: &AuditError) -> StatusCode {
    StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::BAD_REQUEST)
}

fn error(status: StatusCode, message: impl ToString) -> Response {
    (status, Json(ErrorBody::new(message))).into_response()
}
