// shopfront_app/src/main.rs

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use shopfront_app::web::configure_app_routes;
use shopfront_app::{AppConfig, AppState};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront server...");

  let config = AppConfig::from_env().context("loading configuration")?;
  let server_address = format!("{}:{}", config.server_host, config.server_port);
  let app_state = AppState::initialize(config).await.context("initializing application state")?;

  tracing::info!("Binding server to {}...", server_address);
  HttpServer::new(move || {
    App::new()
      .app_data(web::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("binding {}", server_address))?
  .run()
  .await
  .context("running HTTP server")?;

  Ok(())
}
