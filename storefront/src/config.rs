// shopfront_app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use shopfront::seed::SeedOptions;
use std::env;
use std::fmt;

const DEV_SESSION_SECRET: &str = "shopfront-development-session-secret-change-me";
const MIN_SESSION_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,
  pub session_secret: String,
  pub secure_cookies: bool,

  // Seeding on startup
  pub seed_db: bool,
  pub admin_email: String,
  pub admin_password: String,
  pub admin_name: String,
}

impl AppConfig {
  /// Defaults for local development: a file database in the working directory
  /// and the built-in development session secret.
  pub fn local_defaults() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: "sqlite://shopfront.db".to_string(),
      db_max_connections: 5,
      session_secret: DEV_SESSION_SECRET.to_string(),
      secure_cookies: false,
      seed_db: false,
      admin_email: "admin@shopfront.local".to_string(),
      admin_password: "change-me-please".to_string(),
      admin_name: "Store Admin".to_string(),
    }
  }

  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let defaults = Self::local_defaults();
    let get_env = |var_name: &str| env::var(var_name).ok().filter(|v| !v.trim().is_empty());

    let server_host = get_env("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = parse_var("SERVER_PORT", get_env("SERVER_PORT"), defaults.server_port)?;
    let database_url = get_env("DATABASE_URL").unwrap_or(defaults.database_url);
    let db_max_connections = parse_var("DB_MAX_CONNECTIONS", get_env("DB_MAX_CONNECTIONS"), defaults.db_max_connections)?;
    let secure_cookies = parse_var("SECURE_COOKIES", get_env("SECURE_COOKIES"), defaults.secure_cookies)?;
    let seed_db = parse_var("SEED_DB", get_env("SEED_DB"), defaults.seed_db)?;

    let session_secret = match get_env("SESSION_SECRET") {
      Some(secret) if secret.len() >= MIN_SESSION_SECRET_LEN => secret,
      Some(_) => {
        return Err(AppError::Config(format!(
          "SESSION_SECRET must be at least {} bytes long.",
          MIN_SESSION_SECRET_LEN
        )))
      }
      None => {
        tracing::warn!("SESSION_SECRET is not set; using the development secret. Do not run like this in production.");
        defaults.session_secret
      }
    };

    let config = Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      session_secret,
      secure_cookies,
      seed_db,
      admin_email: get_env("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
      admin_password: get_env("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
      admin_name: get_env("ADMIN_NAME").unwrap_or(defaults.admin_name),
    };

    tracing::info!(config = ?config, "Application configuration loaded.");
    Ok(config)
  }

  pub fn seed_options(&self) -> SeedOptions {
    SeedOptions {
      admin_email: self.admin_email.clone(),
      admin_password: self.admin_password.clone(),
      admin_name: self.admin_name.clone(),
    }
  }
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: std::str::FromStr,
  T::Err: fmt::Display,
{
  match raw {
    Some(value) => value
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, value, e))),
    None => Ok(default),
  }
}

// Secrets never reach the logs.
impl fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("database_url", &self.database_url)
      .field("db_max_connections", &self.db_max_connections)
      .field("session_secret", &"[REDACTED]")
      .field("secure_cookies", &self.secure_cookies)
      .field("seed_db", &self.seed_db)
      .field("admin_email", &self.admin_email)
      .field("admin_password", &"[REDACTED]")
      .field("admin_name", &self.admin_name)
      .finish()
  }
}
