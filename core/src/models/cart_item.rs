// shopfront/src/models/cart_item.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One (user, product) pair in a cart. Never carries a price: prices are read
/// live from the product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CartItem {
  pub id: Uuid,
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A cart item joined with the live product row it points at. This is what the
/// cart page shows and what checkout consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CartLine {
  pub cart_item_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i64,
  pub product_name: String,
  pub product_slug: String,
  pub product_image_url: Option<String>,
  pub unit_price_cents: i64,
  pub inventory: i64,
  pub is_published: bool,
}

impl CartLine {
  pub fn line_total_cents(&self) -> i64 {
    self.quantity.saturating_mul(self.unit_price_cents)
  }
}
