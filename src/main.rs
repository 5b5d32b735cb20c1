mod auth;
mod config;

mod db;
mod error;
mod extract;
mod models;
mod routes;

use std::sync::Arc;

use crate::{auth::StaticCredentials, config::Config, models::AppState};

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use axum::http::header;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;
    let pool = db::connect_sqlite(&cfg.database_url, cfg.db_max_connections).await?;
    db::init_schema(&pool).await?;
    tracing::info!(database_url = %cfg.database_url, "connected to database");

    let state = AppState {
        db: pool,
        auth: Arc::new(StaticCredentials::from_config(&cfg)?),
    };

    // The browser frontend may be served from anywhere.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
