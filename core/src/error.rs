// shopfront/src/error.rs
use crate::flow::FlowError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ShopError {
  /// Malformed or out-of-range input. Never retried automatically.
  #[error("Validation Error: {0}")]
  Validation(String),

  /// Absent, or owned by someone else. The two cases are deliberately indistinguishable.
  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Insufficient inventory for {product_name} (requested {requested}, available {available})")]
  InsufficientInventory {
    product_id: Uuid,
    product_name: String,
    requested: i64,
    available: i64,
  },

  /// The in-transaction conditional decrement found the stock already consumed.
  #[error("Inventory for product {product_id} was consumed by a concurrent checkout")]
  InventoryRace { product_id: Uuid },

  #[error("Constraint Violation: {0}")]
  ConstraintViolation(String),

  #[error("Cart is empty")]
  EmptyCart,

  #[error("Product {product_name} is no longer available")]
  ProductUnavailable { product_id: Uuid, product_name: String },

  #[error("Unauthorized: {0}")]
  Unauthorized(String),

  #[error("Forbidden: admin role required")]
  Forbidden,

  #[error("Database Error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration Error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Workflow Error: {0}")]
  Flow(#[from] FlowError),

  #[error("Internal Error: {0}")]
  Internal(String),
}

impl ShopError {
  /// Text safe to show a shopper or admin, e.g. in an `?error=` query parameter.
  pub fn user_message(&self) -> String {
    match self {
      ShopError::Validation(m) | ShopError::NotFound(m) | ShopError::ConstraintViolation(m) => m.clone(),
      ShopError::InsufficientInventory { product_name, .. } => {
        format!("Insufficient inventory for {}.", product_name)
      }
      ShopError::InventoryRace { .. } => "Order placement failed. Please try again.".to_string(),
      ShopError::EmptyCart => "Your cart is empty.".to_string(),
      ShopError::ProductUnavailable { .. } => "One product is unavailable.".to_string(),
      ShopError::Unauthorized(m) => m.clone(),
      ShopError::Forbidden => "You do not have access to that page.".to_string(),
      ShopError::Database(_) | ShopError::Migration(_) | ShopError::Flow(_) | ShopError::Internal(_) => {
        "Something went wrong. Please try again.".to_string()
      }
    }
  }

  /// True for failures the user can fix by retrying or changing their input.
  pub fn is_user_facing(&self) -> bool {
    !matches!(
      self,
      ShopError::Database(_) | ShopError::Migration(_) | ShopError::Flow(_) | ShopError::Internal(_)
    )
  }
}

/// Translates unique and foreign-key violations raised by SQLite into domain errors.
/// Anything else passes through as `ShopError::Database`.
pub(crate) fn translate_constraint(err: sqlx::Error, on_unique: impl FnOnce(&str) -> ShopError, on_foreign_key: &str) -> ShopError {
  if let sqlx::Error::Database(db_err) = &err {
    if db_err.is_unique_violation() {
      return on_unique(db_err.message());
    }
    if db_err.is_foreign_key_violation() {
      return ShopError::ConstraintViolation(on_foreign_key.to_string());
    }
  }
  ShopError::Database(err)
}

impl From<validator::ValidationErrors> for ShopError {
  /// Reports the first failing field, in field-name order, as a readable sentence.
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let message = fields
      .into_iter()
      .find_map(|(field, errs)| errs.first().map(|e| describe_field_error(&field.to_string(), e)))
      .unwrap_or_else(|| "The submitted form is invalid.".to_string());
    ShopError::Validation(message)
  }
}

fn describe_field_error(field: &str, error: &validator::ValidationError) -> String {
  if let Some(message) = &error.message {
    return message.to_string();
  }
  let label = field.trim_end_matches("_cents").replace('_', " ");
  match error.code.as_ref() {
    "length" => format!("The {} has an invalid length.", label),
    "range" => format!("The {} is out of range.", label),
    "email" => "Please enter a valid email address.".to_string(),
    _ => format!("The {} is invalid.", label),
  }
}

pub type Result<T, E = ShopError> = std::result::Result<T, E>;
