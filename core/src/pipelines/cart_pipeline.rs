// shopfront/src/pipelines/cart_pipeline.rs

use crate::cart;
use crate::error::{Result, ShopError};
use crate::flow::{ContextData, Pipeline, PipelineControl, Workflows};
use crate::models::Product;
use crate::pipelines::contexts::AddToCartCtxData;
use tracing::{info, instrument, warn};

pub fn register_add_to_cart_pipeline(workflows: &Workflows<ShopError>) {
  let mut p = Pipeline::<AddToCartCtxData, ShopError>::new(&[
    ("validate_cart_input", false),
    ("fetch_product_for_cart", false),
    ("check_product_stock_for_cart", false),
    ("add_or_update_cart_item_db", false),
  ]);

  p.on("validate_cart_input", validate_cart_input);
  p.on("fetch_product_for_cart", fetch_product_for_cart);
  p.on("check_product_stock_for_cart", check_product_stock_for_cart);
  p.on("add_or_update_cart_item_db", add_or_update_cart_item_db);

  workflows.register(p);
}

async fn validate_cart_input(ctx_data: ContextData<AddToCartCtxData>) -> Result<PipelineControl> {
  let quantity = ctx_data.read().quantity;
  cart::validate_quantity(quantity)?;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "cart_step::fetch_product", skip(ctx_data), err(Display))]
async fn fetch_product_for_cart(ctx_data: ContextData<AddToCartCtxData>) -> Result<PipelineControl> {
  let (product_id, db_pool) = {
    let guard = ctx_data.read();
    (guard.product_id, guard.db_pool.clone())
  };

  let sql = "SELECT id, name, slug, description, image_url, price_cents, compare_at_price_cents, sku, inventory, \
     is_published, category_id, created_at, updated_at FROM products WHERE id = ? AND is_published = 1";
  let product = sqlx::query_as::<_, Product>(sql)
    .bind(product_id)
    .fetch_optional(&db_pool)
    .await?
    .ok_or_else(|| {
      warn!(%product_id, "Product missing or unpublished.");
      ShopError::NotFound("Product not found.".to_string())
    })?;

  ctx_data.write().product = Some(product);
  Ok(PipelineControl::Continue)
}

#[instrument(name = "cart_step::check_stock", skip(ctx_data), err(Display))]
async fn check_product_stock_for_cart(ctx_data: ContextData<AddToCartCtxData>) -> Result<PipelineControl> {
  let (user_id, requested, product, db_pool) = {
    let guard = ctx_data.read();
    (guard.actor.id, guard.quantity, guard.product.clone(), guard.db_pool.clone())
  };
  let product = product.ok_or_else(|| ShopError::Internal("Product was not loaded before the stock check.".to_string()))?;

  let existing = cart::existing_quantity(&db_pool, user_id, product.id).await?;
  let next_quantity = existing + requested;
  if next_quantity > product.inventory {
    warn!(
      product_id = %product.id,
      existing,
      requested,
      available = product.inventory,
      "Not enough inventory for requested cart quantity."
    );
    return Err(ShopError::InsufficientInventory {
      product_id: product.id,
      product_name: product.name,
      requested: next_quantity,
      available: product.inventory,
    });
  }

  Ok(PipelineControl::Continue)
}

#[instrument(name = "cart_step::upsert_item", skip(ctx_data), err(Display))]
async fn add_or_update_cart_item_db(ctx_data: ContextData<AddToCartCtxData>) -> Result<PipelineControl> {
  let (user_id, product_id, quantity, db_pool) = {
    let guard = ctx_data.read();
    (guard.actor.id, guard.product_id, guard.quantity, guard.db_pool.clone())
  };

  match cart::upsert_item(&db_pool, user_id, product_id, quantity).await? {
    Some(item) => {
      info!(cart_item_id = %item.id, %product_id, quantity = item.quantity, "Cart item added or merged.");
      ctx_data.write().updated_cart_item = Some(item);
      Ok(PipelineControl::Continue)
    }
    None => {
      // Stock moved between the check and the write.
      let available = cart::current_inventory(&db_pool, product_id).await?.unwrap_or(0);
      let existing = cart::existing_quantity(&db_pool, user_id, product_id).await?;
      let product_name = ctx_data
        .read()
        .product
        .as_ref()
        .map(|p| p.name.clone())
        .unwrap_or_default();
      warn!(%product_id, available, "Guarded cart write rejected.");
      Err(ShopError::InsufficientInventory {
        product_id,
        product_name,
        requested: existing + quantity,
        available,
      })
    }
  }
}
