// shopfront_app/src/web/mod.rs

pub mod extractors;
pub mod handlers;
pub mod responses;
pub mod routes;
pub mod session;

pub use routes::configure_app_routes;
