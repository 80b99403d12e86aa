// handlers/public/mod.rs - Endpoints reachable without a token

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::store::CaseFileStore;

/// GET / - service information
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Compliance API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "health": "/health (public)",
                "case_files": "/api/case-files[/:case_file_id] (protected)",
                "initiation_options": "/api/case-files/initiation-options (protected)",
                "case_file_numbers": "/api/case-files/case-file-numbers/:case_file_number (protected)",
                "officers": "/api/case-files/:case_file_id/officers (protected)",
                "projects": "/api/projects (protected)",
                "staff_users": "/api/staff-users (protected)",
            }
        }
    }))
}

/// GET /health - liveness plus database connectivity
pub async fn health<S: CaseFileStore>(State(state): State<AppState<S>>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.case_files.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
