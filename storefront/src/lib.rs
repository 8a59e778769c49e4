// shopfront_app/src/lib.rs

//! HTTP surface of the storefront: configuration, application state, the
//! error-to-response mapping, and the actix-web routes.

pub mod config;
pub mod errors;
pub mod state;
pub mod web;

pub use config::AppConfig;
pub use errors::AppError;
pub use state::AppState;
