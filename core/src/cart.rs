// shopfront/src/cart.rs

//! Cart Manager: one cart per user, re-validated against live stock on every
//! write. These guards keep a cart honest at the moment of the write; checkout
//! re-checks everything inside its own transaction.

use crate::error::{Result, ShopError};
use crate::flow::{ContextData, PipelineResult, Workflows};
use crate::models::{Actor, CartItem, CartLine};
use crate::pipelines::contexts::AddToCartCtxData;
use crate::MAX_LINE_QUANTITY;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

const CART_ITEM_COLUMNS: &str = "id, user_id, product_id, quantity, created_at, updated_at";

/// Adds `quantity` units of a published product to the actor's cart, merging
/// with an existing line for the same product. The merged quantity must not
/// exceed the product's inventory; otherwise nothing is written and the call
/// fails with `InsufficientInventory`.
#[instrument(skip(workflows, pool, actor), fields(user_id = %actor.id), err(Display))]
pub async fn add_item(
  workflows: &Workflows<ShopError>,
  pool: &SqlitePool,
  actor: &Actor,
  product_id: Uuid,
  quantity: i64,
) -> Result<CartItem> {
  let ctx_data = ContextData::new(AddToCartCtxData::new(pool.clone(), actor.clone(), product_id, quantity));

  match workflows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {}
    PipelineResult::Stopped => {
      return Err(ShopError::Internal("Add-to-cart workflow stopped before writing.".to_string()));
    }
  }

  let updated = ctx_data.read().updated_cart_item.clone();
  updated.ok_or_else(|| ShopError::Internal("Add-to-cart workflow produced no cart item.".to_string()))
}

/// Replaces a line's quantity. Another user's item is reported as `NotFound`.
#[instrument(skip(pool, actor), fields(user_id = %actor.id), err(Display))]
pub async fn set_item_quantity(pool: &SqlitePool, actor: &Actor, cart_item_id: Uuid, quantity: i64) -> Result<CartItem> {
  validate_quantity(quantity)?;

  let line = find_line(pool, actor.id, cart_item_id)
    .await?
    .ok_or_else(|| ShopError::NotFound("Cart item not found.".to_string()))?;

  if quantity > line.inventory {
    warn!(%cart_item_id, quantity, available = line.inventory, "Requested quantity exceeds inventory.");
    return Err(insufficient(&line, quantity));
  }

  // The stock comparison is repeated inside the write so a concurrent
  // inventory change between the read above and here cannot slip through.
  let sql = format!(
    "UPDATE cart_items SET quantity = ?1, updated_at = ?2 \
     WHERE id = ?3 AND user_id = ?4 \
       AND ?1 <= (SELECT inventory FROM products WHERE id = cart_items.product_id) \
     RETURNING {CART_ITEM_COLUMNS}"
  );
  let updated = sqlx::query_as::<_, CartItem>(&sql)
    .bind(quantity)
    .bind(Utc::now())
    .bind(cart_item_id)
    .bind(actor.id)
    .fetch_optional(pool)
    .await?;

  match updated {
    Some(item) => {
      info!(%cart_item_id, quantity, "Cart item quantity updated.");
      Ok(item)
    }
    None => {
      let available = current_inventory(pool, line.product_id).await?.unwrap_or(0);
      Err(ShopError::InsufficientInventory {
        product_id: line.product_id,
        product_name: line.product_name,
        requested: quantity,
        available,
      })
    }
  }
}

/// Deletes the line if it exists and belongs to the actor. Anything else is a no-op.
#[instrument(skip(pool, actor), fields(user_id = %actor.id), err(Display))]
pub async fn remove_item(pool: &SqlitePool, actor: &Actor, cart_item_id: Uuid) -> Result<()> {
  let result = sqlx::query("DELETE FROM cart_items WHERE id = ? AND user_id = ?")
    .bind(cart_item_id)
    .bind(actor.id)
    .execute(pool)
    .await?;
  info!(%cart_item_id, removed = result.rows_affected(), "Cart item removal processed.");
  Ok(())
}

/// The actor's cart joined with live product data, oldest line first.
#[instrument(skip(pool, actor), fields(user_id = %actor.id), err(Display))]
pub async fn list_items(pool: &SqlitePool, actor: &Actor) -> Result<Vec<CartLine>> {
  lines_for_user(pool, actor.id).await
}

pub(crate) async fn lines_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<CartLine>> {
  let lines = sqlx::query_as::<_, CartLine>(
    "SELECT ci.id AS cart_item_id, ci.product_id, ci.quantity, p.name AS product_name, p.slug AS product_slug, \
       p.image_url AS product_image_url, p.price_cents AS unit_price_cents, p.inventory, p.is_published \
     FROM cart_items ci JOIN products p ON p.id = ci.product_id \
     WHERE ci.user_id = ? \
     ORDER BY ci.created_at ASC, ci.rowid ASC",
  )
  .bind(user_id)
  .fetch_all(pool)
  .await?;
  Ok(lines)
}

async fn find_line(pool: &SqlitePool, user_id: Uuid, cart_item_id: Uuid) -> Result<Option<CartLine>> {
  let line = sqlx::query_as::<_, CartLine>(
    "SELECT ci.id AS cart_item_id, ci.product_id, ci.quantity, p.name AS product_name, p.slug AS product_slug, \
       p.image_url AS product_image_url, p.price_cents AS unit_price_cents, p.inventory, p.is_published \
     FROM cart_items ci JOIN products p ON p.id = ci.product_id \
     WHERE ci.id = ? AND ci.user_id = ?",
  )
  .bind(cart_item_id)
  .bind(user_id)
  .fetch_optional(pool)
  .await?;
  Ok(line)
}

pub(crate) fn validate_quantity(quantity: i64) -> Result<()> {
  if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
    return Err(ShopError::Validation(format!(
      "Quantity must be between 1 and {}.",
      MAX_LINE_QUANTITY
    )));
  }
  Ok(())
}

/// Quantity already in the user's cart for `product_id`, zero when absent.
pub(crate) async fn existing_quantity(pool: &SqlitePool, user_id: Uuid, product_id: Uuid) -> Result<i64> {
  let quantity = sqlx::query_scalar::<_, i64>("SELECT quantity FROM cart_items WHERE user_id = ? AND product_id = ?")
    .bind(user_id)
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
  Ok(quantity.unwrap_or(0))
}

pub(crate) async fn current_inventory(pool: &SqlitePool, product_id: Uuid) -> Result<Option<i64>> {
  let inventory = sqlx::query_scalar::<_, i64>("SELECT inventory FROM products WHERE id = ?")
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
  Ok(inventory)
}

/// Inserts a line or adds to the existing one in a single statement that also
/// checks the merged quantity against the product's inventory. `None` means the
/// stock guard rejected the write.
pub(crate) async fn upsert_item(
  pool: &SqlitePool,
  user_id: Uuid,
  product_id: Uuid,
  quantity: i64,
) -> Result<Option<CartItem>> {
  let sql = format!(
    "INSERT INTO cart_items (id, user_id, product_id, quantity, created_at, updated_at) \
     SELECT ?1, ?2, ?3, ?4, ?5, ?5 \
     WHERE (SELECT inventory FROM products WHERE id = ?3) >= ?4 \
     ON CONFLICT (user_id, product_id) DO UPDATE \
       SET quantity = cart_items.quantity + excluded.quantity, updated_at = excluded.updated_at \
       WHERE cart_items.quantity + excluded.quantity <= \
         (SELECT inventory FROM products WHERE id = excluded.product_id) \
     RETURNING {CART_ITEM_COLUMNS}"
  );
  let item = sqlx::query_as::<_, CartItem>(&sql)
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;
  Ok(item)
}

fn insufficient(line: &CartLine, requested: i64) -> ShopError {
  ShopError::InsufficientInventory {
    product_id: line.product_id,
    product_name: line.product_name.clone(),
    requested,
    available: line.inventory,
  }
}
