use std::sync::Arc;

use crate::game::{Campaign, Catalog, TokioClock};
use crate::utils::signal::shutdown_signal;
use crate::{error::AppResult, web::AppState};
use axum::Router;
use tokio::net::TcpListener;

pub mod config;
pub use config::{Config, ConfigError, ConfigResult};

pub mod error;
pub mod game;
pub mod utils;
pub mod web;

static APPLICATION_NAME: &str = "flood-adventure";

/// Loads the catalog named in the config, or the built-in one.
pub fn load_catalog(config: &Config) -> AppResult<Catalog> {
    let catalog = match config.app().catalog() {
        Some(path) => Catalog::from_file(path)?,
        None => Catalog::builtin()?,
    };
    Ok(catalog)
}

pub async fn build_server() -> AppResult<(AppState, Router)> {
    let use_local = cfg!(debug_assertions);
    let config = config::Config::get_or_init(use_local).await;

    let catalog = load_catalog(config)?;
    tracing::debug!("{} levels available", catalog.entries().len());

    let state = AppState::new(Campaign::new(&catalog), config.timing(), Arc::new(TokioClock));
    Ok(build_server_with_state(state, config.app().docs()))
}

pub fn build_server_with_state(state: AppState, docs: bool) -> (AppState, Router) {
    let app = web::routes::build_app(state.clone(), docs);
    (state, app)
}

#[tracing::instrument]
pub async fn setup_workers() -> AppResult<()> {
    let (_, app) = build_server().await?;
    let config = Config::get_or_init(cfg!(debug_assertions)).await;
    let listener = TcpListener::bind(config.host().bindto()).await?;

    tracing::info!("axum is starting at: {}", config.host().bindto());
    let axum_handle = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());

    axum_handle.await?;
    Ok(())
}

pub fn setup_trace() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

    // load .env file for RUST_LOG etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .with(ErrorLayer::default())
        .init();

    tracing::debug!("tracing initialized.");
}

#[tracing::instrument]
pub async fn run() -> AppResult<()> {
    setup_trace();
    setup_workers().await?;
    Ok(())
}
