// shopfront/src/ledger.rs

//! Order Ledger: read access to placed orders and the single permitted
//! mutation, an admin status change. Orders are only ever created by
//! `checkout::commit_order`.

use crate::error::{Result, ShopError};
use crate::models::{Actor, AdminActor, Order, OrderItem, OrderStatus, OrderSummary, OrderWithItems};

use chrono::Utc;
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use tracing::{info, instrument};
use uuid::Uuid;

const ORDER_COLUMNS: &str = "o.id, o.user_id, o.status, o.total_cents, o.shipping_name, o.shipping_email, \
   o.shipping_phone, o.shipping_address1, o.shipping_address2, o.shipping_city, o.shipping_state, \
   o.shipping_postal_code, o.shipping_country, o.notes, o.created_at, o.updated_at";

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct StoreOverview {
  pub user_count: i64,
  pub product_count: i64,
  pub published_product_count: i64,
  pub order_count: i64,
  pub gross_revenue_cents: i64,
}

/// The actor's orders with their items, newest first.
#[instrument(skip(pool, actor), fields(user_id = %actor.id), err(Display))]
pub async fn list_orders_for_user(pool: &SqlitePool, actor: &Actor) -> Result<Vec<OrderWithItems>> {
  let sql = format!("SELECT {ORDER_COLUMNS} FROM orders o WHERE o.user_id = ? ORDER BY o.created_at DESC, o.rowid DESC");
  let orders = sqlx::query_as::<_, Order>(&sql).bind(actor.id).fetch_all(pool).await?;

  let mut with_items = Vec::with_capacity(orders.len());
  for order in orders {
    let items = items_for_order(pool, order.id).await?;
    with_items.push(OrderWithItems { order, items });
  }
  Ok(with_items)
}

/// One of the actor's own orders. Someone else's order is `NotFound`.
#[instrument(skip(pool, actor), fields(user_id = %actor.id), err(Display))]
pub async fn get_order_for_user(pool: &SqlitePool, actor: &Actor, order_id: Uuid) -> Result<OrderWithItems> {
  let sql = format!("SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id = ? AND o.user_id = ?");
  let order = sqlx::query_as::<_, Order>(&sql)
    .bind(order_id)
    .bind(actor.id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ShopError::NotFound("Order not found.".to_string()))?;

  let items = items_for_order(pool, order.id).await?;
  Ok(OrderWithItems { order, items })
}

/// Every order with its owner joined in, newest first.
#[instrument(skip(pool, admin), fields(admin_id = %admin.id()), err(Display))]
pub async fn list_all_orders(pool: &SqlitePool, admin: &AdminActor) -> Result<Vec<OrderSummary>> {
  let sql = format!(
    "SELECT {ORDER_COLUMNS}, u.email AS user_email, u.name AS user_name \
     FROM orders o JOIN users u ON u.id = o.user_id \
     ORDER BY o.created_at DESC, o.rowid DESC"
  );
  let orders = sqlx::query_as::<_, OrderSummary>(&sql).fetch_all(pool).await?;
  Ok(orders)
}

/// Sets an order's status. Any status may follow any other.
#[instrument(skip(pool, admin), fields(admin_id = %admin.id()), err(Display))]
pub async fn update_order_status(
  pool: &SqlitePool,
  admin: &AdminActor,
  order_id: Uuid,
  status: OrderStatus,
) -> Result<Order> {
  let order = sqlx::query_as::<_, Order>(
    "UPDATE orders SET status = ?, updated_at = ? WHERE id = ? \
     RETURNING id, user_id, status, total_cents, shipping_name, shipping_email, shipping_phone, shipping_address1, \
       shipping_address2, shipping_city, shipping_state, shipping_postal_code, shipping_country, notes, \
       created_at, updated_at",
  )
  .bind(status)
  .bind(Utc::now())
  .bind(order_id)
  .fetch_optional(pool)
  .await?
  .ok_or_else(|| ShopError::NotFound("Order not found.".to_string()))?;

  info!(%order_id, status = status.as_str(), "Order status updated.");
  Ok(order)
}

#[instrument(skip(pool, admin), fields(admin_id = %admin.id()), err(Display))]
pub async fn overview(pool: &SqlitePool, admin: &AdminActor) -> Result<StoreOverview> {
  let stats = sqlx::query_as::<_, StoreOverview>(
    "SELECT \
       (SELECT COUNT(*) FROM users) AS user_count, \
       (SELECT COUNT(*) FROM products) AS product_count, \
       (SELECT COUNT(*) FROM products WHERE is_published = 1) AS published_product_count, \
       (SELECT COUNT(*) FROM orders) AS order_count, \
       (SELECT COALESCE(SUM(total_cents), 0) FROM orders) AS gross_revenue_cents",
  )
  .fetch_one(pool)
  .await?;
  Ok(stats)
}

async fn items_for_order(pool: &SqlitePool, order_id: Uuid) -> Result<Vec<OrderItem>> {
  let items = sqlx::query_as::<_, OrderItem>(
    "SELECT id, order_id, product_id, quantity, unit_price_cents, product_name, product_slug, product_image_url \
     FROM order_items WHERE order_id = ? ORDER BY rowid ASC",
  )
  .bind(order_id)
  .fetch_all(pool)
  .await?;
  Ok(items)
}
