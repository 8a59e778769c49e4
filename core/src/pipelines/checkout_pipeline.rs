// shopfront/src/pipelines/checkout_pipeline.rs

use crate::cart;
use crate::checkout;
use crate::error::{Result, ShopError};
use crate::flow::{ContextData, Pipeline, PipelineControl, Workflows};
use crate::pipelines::contexts::CheckoutCtxData;
use tracing::{info, instrument};

pub fn register_checkout_pipeline(workflows: &Workflows<ShopError>) {
  let mut p = Pipeline::<CheckoutCtxData, ShopError>::new(&[
    ("validate_shipping_details", false),
    ("load_cart_for_checkout", false),
    ("verify_cart_availability", false),
    ("place_order_atomically", false),
  ]);

  p.on("validate_shipping_details", validate_shipping_details);
  p.on("load_cart_for_checkout", load_cart_for_checkout);
  p.on("verify_cart_availability", verify_cart_availability);
  p.on("place_order_atomically", place_order_atomically);

  workflows.register(p);
}

async fn validate_shipping_details(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl> {
  let mut guard = ctx_data.write();
  let shipping = std::mem::take(&mut guard.shipping);
  guard.shipping = checkout::validate_shipping(shipping)?;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "checkout_step::load_cart", skip(ctx_data), err(Display))]
async fn load_cart_for_checkout(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl> {
  let (user_id, db_pool) = {
    let guard = ctx_data.read();
    (guard.actor.id, guard.db_pool.clone())
  };

  let lines = cart::lines_for_user(&db_pool, user_id).await?;
  if lines.is_empty() {
    return Err(ShopError::EmptyCart);
  }
  info!(line_count = lines.len(), "Cart loaded for checkout.");
  ctx_data.write().cart_lines = lines;
  Ok(PipelineControl::Continue)
}

async fn verify_cart_availability(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl> {
  checkout::verify_cart_availability(&ctx_data.read().cart_lines)?;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "checkout_step::place_order", skip(ctx_data), err(Display))]
async fn place_order_atomically(ctx_data: ContextData<CheckoutCtxData>) -> Result<PipelineControl> {
  let (user_id, lines, shipping, db_pool) = {
    let guard = ctx_data.read();
    (guard.actor.id, guard.cart_lines.clone(), guard.shipping.clone(), guard.db_pool.clone())
  };

  let order_id = checkout::commit_order(&db_pool, user_id, &lines, &shipping).await?;
  ctx_data.write().order_id = Some(order_id);
  Ok(PipelineControl::Continue)
}
