//! Health check endpoints

use axum::{Json, Router, http::StatusCode, routing::get};
use axum_helpers::{HealthCheckFuture, health_router, run_health_checks};
use database::mongodb::check_health_detailed;
use serde_json::Value;

use crate::state::AppState;

async fn ready(state: AppState) -> (StatusCode, Json<Value>) {
    let database: HealthCheckFuture = Box::pin(async move {
        let status = check_health_detailed(&state.mongo_client).await;
        if status.healthy {
            Ok(())
        } else {
            Err(status.message.unwrap_or_else(|| "ping failed".to_string()))
        }
    });

    run_health_checks(vec![("database", database)]).await
}

/// `GET /health` (liveness) and `GET /ready` (MongoDB ping)
pub fn router(state: AppState) -> Router {
    health_router(state.config.app)
        .route("/ready", get(move || ready(state.clone())))
}
