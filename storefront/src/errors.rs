// shopfront_app/src/errors.rs

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use shopfront::ShopError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Shop(#[from] ShopError),

  #[error("Configuration Error: {0}")]
  Config(String),

  /// No valid session on a route that needs one. `next` is where to return after signing in.
  #[error("Login required")]
  LoginRequired { next: String },

  #[error("Admin role required")]
  AdminRequired,

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<sqlx::Error> for AppError {
  fn from(err: sqlx::Error) -> Self {
    AppError::Shop(ShopError::Database(err))
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Shop(shop_err) => match shop_err {
        ShopError::Validation(_) | ShopError::EmptyCart => StatusCode::BAD_REQUEST,
        ShopError::NotFound(_) => StatusCode::NOT_FOUND,
        ShopError::InsufficientInventory { .. }
        | ShopError::InventoryRace { .. }
        | ShopError::ConstraintViolation(_)
        | ShopError::ProductUnavailable { .. } => StatusCode::CONFLICT,
        ShopError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        ShopError::Forbidden => StatusCode::FORBIDDEN,
        ShopError::Database(_) | ShopError::Migration(_) | ShopError::Flow(_) | ShopError::Internal(_) => {
          StatusCode::INTERNAL_SERVER_ERROR
        }
      },
      AppError::LoginRequired { .. } | AppError::AdminRequired => StatusCode::SEE_OTHER,
      AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    match self {
      AppError::LoginRequired { next } => {
        let query = serde_urlencoded::to_string(&[("next", next.as_str())]).unwrap_or_default();
        HttpResponse::SeeOther()
          .insert_header((header::LOCATION, format!("/login?{}", query)))
          .finish()
      }
      AppError::AdminRequired => HttpResponse::SeeOther().insert_header((header::LOCATION, "/")).finish(),
      AppError::Shop(shop_err) => {
        if shop_err.is_user_facing() {
          tracing::warn!(error = %shop_err, "Request rejected.");
        } else {
          tracing::error!(error = %shop_err, "Responding with error");
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": shop_err.user_message() }))
      }
      AppError::Config(_) | AppError::Internal(_) => {
        tracing::error!(application_error = %self, "Responding with error");
        HttpResponse::InternalServerError().json(json!({ "error": "An internal error occurred" }))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
