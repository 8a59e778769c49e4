// shopfront/src/checkout.rs

//! Checkout: turns a cart into an order exactly once.
//!
//! `place_order` runs the checkout workflow: shipping validation, the cheap
//! fail-fast checks against the observed cart, then [`commit_order`]. The
//! commit is one SQLite transaction. Each line's stock is taken with a
//! conditional decrement whose affected-row count decides whether the
//! reservation held; a miss aborts the whole transaction with `InventoryRace`,
//! leaving inventory, cart and orders untouched.

use crate::catalog;
use crate::error::{Result, ShopError};
use crate::flow::{ContextData, PipelineResult, Workflows};
use crate::models::{Actor, CartLine, OrderStatus, ProductSnapshot, ShippingDetails};
use crate::pipelines::contexts::CheckoutCtxData;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// Places an order for everything in the actor's cart and returns its id.
#[instrument(skip(workflows, pool, actor, shipping), fields(user_id = %actor.id), err(Display))]
pub async fn place_order(
  workflows: &Workflows<ShopError>,
  pool: &SqlitePool,
  actor: &Actor,
  shipping: ShippingDetails,
) -> Result<Uuid> {
  let ctx_data = ContextData::new(CheckoutCtxData::new(pool.clone(), actor.clone(), shipping));

  if let PipelineResult::Stopped = workflows.run(ctx_data.clone()).await? {
    return Err(ShopError::Internal("Checkout workflow stopped before placing the order.".to_string()));
  }

  let order_id = ctx_data.read().order_id;
  order_id.ok_or_else(|| ShopError::Internal("Checkout workflow produced no order.".to_string()))
}

/// Trims and validates shipping input.
pub fn validate_shipping(shipping: ShippingDetails) -> Result<ShippingDetails> {
  let shipping = shipping.normalized();
  shipping.validate().map_err(|errors| {
    warn!(%errors, "Shipping details rejected.");
    ShopError::Validation("Please fill out all required shipping details.".to_string())
  })?;
  Ok(shipping)
}

/// The fail-fast preconditions, in order: a non-empty cart, every product still
/// published, every quantity within the observed inventory.
pub fn verify_cart_availability(lines: &[CartLine]) -> Result<()> {
  if lines.is_empty() {
    return Err(ShopError::EmptyCart);
  }

  if let Some(line) = lines.iter().find(|l| !l.is_published) {
    warn!(product_id = %line.product_id, "Cart holds an unpublished product.");
    return Err(ShopError::ProductUnavailable {
      product_id: line.product_id,
      product_name: line.product_name.clone(),
    });
  }

  if let Some(line) = lines.iter().find(|l| l.quantity > l.inventory) {
    warn!(
      product_id = %line.product_id,
      requested = line.quantity,
      available = line.inventory,
      "Cart quantity exceeds observed inventory."
    );
    return Err(ShopError::InsufficientInventory {
      product_id: line.product_id,
      product_name: line.product_name.clone(),
      requested: line.quantity,
      available: line.inventory,
    });
  }

  Ok(())
}

/// The atomic unit: reserve stock for every line, record the order and its
/// snapshot items at the prices read by the reservations, and empty the
/// user's cart. Nothing is visible unless all of it succeeds.
///
/// `lines` is whatever cart snapshot the caller observed; it may be stale.
#[instrument(skip(pool, lines, shipping), fields(line_count = lines.len()), err(Display))]
pub async fn commit_order(
  pool: &SqlitePool,
  user_id: Uuid,
  lines: &[CartLine],
  shipping: &ShippingDetails,
) -> Result<Uuid> {
  if lines.is_empty() {
    return Err(ShopError::EmptyCart);
  }

  let mut tx = pool.begin().await?;

  let mut reserved: Vec<(ProductSnapshot, i64)> = Vec::with_capacity(lines.len());
  for line in lines {
    match catalog::adjust_inventory(&mut *tx, line.product_id, -line.quantity).await? {
      Some(snapshot) => reserved.push((snapshot, line.quantity)),
      None => {
        warn!(product_id = %line.product_id, quantity = line.quantity, "Conditional decrement missed; aborting checkout.");
        return Err(ShopError::InventoryRace {
          product_id: line.product_id,
        });
      }
    }
  }

  let total_cents = reserved
    .iter()
    .try_fold(0i64, |acc, (snapshot, quantity)| {
      snapshot.unit_price_cents.checked_mul(*quantity).and_then(|line| acc.checked_add(line))
    })
    .ok_or_else(|| ShopError::Internal("Order total overflowed.".to_string()))?;

  let order_id = Uuid::new_v4();
  let now = Utc::now();
  sqlx::query(
    "INSERT INTO orders (id, user_id, status, total_cents, shipping_name, shipping_email, shipping_phone, \
       shipping_address1, shipping_address2, shipping_city, shipping_state, shipping_postal_code, shipping_country, \
       notes, created_at, updated_at) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
  )
  .bind(order_id)
  .bind(user_id)
  .bind(OrderStatus::Pending)
  .bind(total_cents)
  .bind(&shipping.shipping_name)
  .bind(&shipping.shipping_email)
  .bind(&shipping.shipping_phone)
  .bind(&shipping.shipping_address1)
  .bind(&shipping.shipping_address2)
  .bind(&shipping.shipping_city)
  .bind(&shipping.shipping_state)
  .bind(&shipping.shipping_postal_code)
  .bind(&shipping.shipping_country)
  .bind(&shipping.notes)
  .bind(now)
  .bind(now)
  .execute(&mut *tx)
  .await?;

  for (snapshot, quantity) in &reserved {
    sqlx::query(
      "INSERT INTO order_items (id, order_id, product_id, quantity, unit_price_cents, product_name, product_slug, \
         product_image_url) \
       VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4())
    .bind(order_id)
    .bind(snapshot.product_id)
    .bind(*quantity)
    .bind(snapshot.unit_price_cents)
    .bind(&snapshot.name)
    .bind(&snapshot.slug)
    .bind(&snapshot.image_url)
    .execute(&mut *tx)
    .await?;
  }

  sqlx::query("DELETE FROM cart_items WHERE user_id = ?")
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

  tx.commit().await?;

  info!(%order_id, %user_id, total_cents, "Order placed.");
  Ok(order_id)
}
