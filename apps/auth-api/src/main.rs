use axum_helpers::server::{CleanupCoordinator, create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    // A missing .env file is fine; real deployments set the environment directly
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(database = %config.mongodb.database, "Connecting to MongoDB");
    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(&config.mongodb.database);
    api::auth::init_indexes(&db).await?;

    info!("Connecting to Redis");
    let redis = database::redis::connect_from_config_with_retry(&config.redis, None).await?;

    let state = AppState {
        config,
        mongo_client,
        db,
        redis,
    };

    let api_routes = api::routes(&state);
    let router = create_router::<openapi::ApiDoc>(api_routes)?;
    let app = router.merge(health_router(state.config.app));

    info!("Starting Auth API with graceful shutdown (30s timeout)");

    let AppState {
        config,
        mongo_client,
        redis,
        ..
    } = state;

    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        let mut cleanup = CleanupCoordinator::new();
        cleanup.add_task("mongodb", database::mongodb::close(mongo_client));
        cleanup.add_task("redis", database::redis::close(redis));
        cleanup.run().await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Auth API shutdown complete");
    Ok(())
}
