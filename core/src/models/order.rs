// shopfront/src/models/order.rs

use crate::error::ShopError;
use crate::models::order_item::OrderItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle of a placed order: `Pending -> Paid -> Processing -> Shipped -> Delivered`,
/// with `Cancelled` reachable from any of the non-terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, SqlxType)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
  Pending,
  Paid,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 6] = [
    OrderStatus::Pending,
    OrderStatus::Paid,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "PENDING",
      OrderStatus::Paid => "PAID",
      OrderStatus::Processing => "PROCESSING",
      OrderStatus::Shipped => "SHIPPED",
      OrderStatus::Delivered => "DELIVERED",
      OrderStatus::Cancelled => "CANCELLED",
    }
  }
}

impl FromStr for OrderStatus {
  type Err = ShopError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim();
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
      .ok_or_else(|| ShopError::Validation(format!("Unknown order status '{}'.", wanted)))
  }
}

/// Where an order ships. Field names match the `orders` columns so the struct
/// can be flattened into `Order`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow, Validate)]
#[serde(default)]
pub struct ShippingDetails {
  #[validate(length(min = 2, max = 120))]
  pub shipping_name: String,
  #[validate(email)]
  pub shipping_email: String,
  #[validate(length(max = 30))]
  pub shipping_phone: Option<String>,
  #[validate(length(min = 3, max = 160))]
  pub shipping_address1: String,
  #[validate(length(max = 160))]
  pub shipping_address2: Option<String>,
  #[validate(length(min = 2, max = 120))]
  pub shipping_city: String,
  #[validate(length(min = 2, max = 120))]
  pub shipping_state: String,
  #[validate(length(min = 3, max = 20))]
  pub shipping_postal_code: String,
  #[validate(length(min = 2, max = 120))]
  pub shipping_country: String,
  #[validate(length(max = 500))]
  pub notes: Option<String>,
}

impl ShippingDetails {
  pub fn normalized(self) -> Self {
    use crate::models::non_blank;
    Self {
      shipping_name: self.shipping_name.trim().to_string(),
      shipping_email: self.shipping_email.trim().to_string(),
      shipping_phone: non_blank(self.shipping_phone),
      shipping_address1: self.shipping_address1.trim().to_string(),
      shipping_address2: non_blank(self.shipping_address2),
      shipping_city: self.shipping_city.trim().to_string(),
      shipping_state: self.shipping_state.trim().to_string(),
      shipping_postal_code: self.shipping_postal_code.trim().to_string(),
      shipping_country: self.shipping_country.trim().to_string(),
      notes: non_blank(self.notes),
    }
  }
}

/// A placed order. Only `status` (and `updated_at`) ever change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub status: OrderStatus,
  /// Frozen at placement: the sum of quantity x unit price over the order's items.
  pub total_cents: i64,
  #[sqlx(flatten)]
  #[serde(flatten)]
  pub shipping: ShippingDetails,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Admin list row: an order with its owner joined in.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderSummary {
  #[sqlx(flatten)]
  #[serde(flatten)]
  pub order: Order,
  pub user_email: String,
  pub user_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
  #[serde(flatten)]
  pub order: Order,
  pub items: Vec<OrderItem>,
}

impl OrderWithItems {
  pub fn items_total_cents(&self) -> i64 {
    self.items.iter().map(OrderItem::line_total_cents).sum()
  }
}
