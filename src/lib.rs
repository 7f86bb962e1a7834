// src/lib.rs

//! Multi-role food-ordering backend: customers browse and order, restaurant
//! owners confirm or cancel, admins close out deliveries. The interesting
//! part is the order lifecycle -- checkout creates PENDING orders, the
//! payment gateway confirms them PAID through signed callbacks, and a
//! background sweep expires the ones nobody confirms in time.

pub mod config;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod services;
pub mod state;
pub mod sweep;
pub mod web;

use std::sync::Arc;

use actix_web::{web as actix_data, App, HttpServer};
use sqlx::PgPool;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::AppConfig;
use crate::state::AppState;

pub async fn run() -> std::io::Result<()> {
  // Initialize tracing subscriber for logging
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting foodcourt server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  let db_pool = match PgPool::connect(&app_config.database_url).await {
    Ok(pool) => {
      tracing::info!("Successfully connected to the database.");
      pool
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  if let Err(e) = sqlx::migrate!("./migrations").run(&db_pool).await {
    tracing::error!(error = %e, "Failed to run database migrations.");
    panic!("Migration error: {}", e);
  }

  let app_state = AppState::new(db_pool, app_config.clone());

  // Idle-order expiry sweep; one task for the whole server.
  let _sweep_handle = sweep::spawn_expiry_sweep(app_state.clone());
  tracing::info!(
    interval_secs = app_config.sweep_interval_secs,
    "Expiry sweep scheduled."
  );

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(web::routes::configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
