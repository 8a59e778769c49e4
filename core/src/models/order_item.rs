// shopfront/src/models/order_item.rs

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Product fields copied by value at the moment of purchase. Later edits to, or
/// removal of, the live product never reach an order through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ProductSnapshot {
  pub product_id: Uuid,
  pub name: String,
  pub slug: String,
  pub image_url: Option<String>,
  pub unit_price_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i64,
  pub unit_price_cents: i64,
  pub product_name: String,
  pub product_slug: String,
  pub product_image_url: Option<String>,
}

impl OrderItem {
  pub fn line_total_cents(&self) -> i64 {
    self.quantity * self.unit_price_cents
  }
}
