use axum_helpers::{JwtAuth, create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
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

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(config.mongodb.database());
    info!(database = %config.mongodb.database(), "Connected to MongoDB");

    api::init_indexes(&db).await?;

    let state = AppState {
        jwt: JwtAuth::new(&config.jwt),
        config,
        mongo_client,
        db,
    };

    let router = create_router::<openapi::ApiDoc>(api::routes(&state)).await?;
    let app = router.merge(health_router(state.config.app));

    info!(
        environment = ?state.config.environment,
        "Starting warehouse API"
    );

    let server = state.config.server.clone();
    let mongo_client = state.mongo_client;
    create_production_app(app, &server, async move {
        info!("Closing MongoDB connections");
        mongo_client.shutdown().await;
    })
    .await?;

    info!("Warehouse API shutdown complete");
    Ok(())
}
