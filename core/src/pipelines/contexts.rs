// shopfront/src/pipelines/contexts.rs

//! Data carried through each workflow run. Handlers receive these wrapped in
//! `ContextData`.

use crate::models::{Actor, CartItem, CartLine, Product, ShippingDetails};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AddToCartCtxData {
  pub db_pool: SqlitePool,
  pub actor: Actor,
  pub product_id: Uuid,
  pub quantity: i64,
  /// Set by `fetch_product_for_cart`.
  pub product: Option<Product>,
  /// Set by `add_or_update_cart_item_db`.
  pub updated_cart_item: Option<CartItem>,
}

impl AddToCartCtxData {
  pub fn new(db_pool: SqlitePool, actor: Actor, product_id: Uuid, quantity: i64) -> Self {
    Self {
      db_pool,
      actor,
      product_id,
      quantity,
      product: None,
      updated_cart_item: None,
    }
  }
}

#[derive(Debug, Clone)]
pub struct CheckoutCtxData {
  pub db_pool: SqlitePool,
  pub actor: Actor,
  pub shipping: ShippingDetails,
  /// Snapshot of the cart taken by `load_cart_for_checkout`.
  pub cart_lines: Vec<CartLine>,
  pub order_id: Option<Uuid>,
}

impl CheckoutCtxData {
  pub fn new(db_pool: SqlitePool, actor: Actor, shipping: ShippingDetails) -> Self {
    Self {
      db_pool,
      actor,
      shipping,
      cart_lines: Vec::new(),
      order_id: None,
    }
  }
}
