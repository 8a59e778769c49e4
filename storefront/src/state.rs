// shopfront_app/src/state.rs

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use actix_web::cookie::Key;
use shopfront::flow::Workflows;
use shopfront::{db, pipelines, seed, ShopError};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub db_pool: SqlitePool,
  pub workflows: Arc<Workflows<ShopError>>,
  pub config: Arc<AppConfig>,
  /// Signs the session cookie. Derived from `config.session_secret`.
  pub session_key: Key,
}

impl AppState {
  /// Wires state around an already migrated pool and registers the workflows.
  pub fn new(db_pool: SqlitePool, config: AppConfig) -> Result<Self> {
    if config.session_secret.len() < 32 {
      return Err(AppError::Config("Session secret must be at least 32 bytes long.".to_string()));
    }
    let session_key = Key::derive_from(config.session_secret.as_bytes());

    let workflows = Arc::new(Workflows::new());
    pipelines::register_all_pipelines(&workflows);

    Ok(Self {
      db_pool,
      workflows,
      config: Arc::new(config),
      session_key,
    })
  }

  /// Connects, migrates, optionally seeds, and builds the state.
  pub async fn initialize(config: AppConfig) -> Result<Self> {
    let db_pool = db::connect(&config.database_url, config.db_max_connections).await?;
    db::migrate(&db_pool).await?;
    tracing::info!("Database ready.");

    if config.seed_db {
      seed::seed_database(&db_pool, &config.seed_options()).await?;
    }

    Self::new(db_pool, config)
  }
}
