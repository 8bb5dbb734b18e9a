//! Readiness endpoint checking both stores

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

/// 200 when MongoDB and Redis both answer a ping, 503 otherwise
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut conn = state.redis.clone();

    let mongodb: HealthCheckFuture<'_> = Box::pin(async {
        database::mongodb::check_health(&state.mongo_client)
            .await
            .map_err(|e| e.to_string())
    });
    let redis: HealthCheckFuture<'_> = Box::pin(async move {
        database::redis::check_health(&mut conn)
            .await
            .map_err(|e| e.to_string())
    });

    run_health_checks(vec![("mongodb", mongodb), ("redis", redis)]).await
}
