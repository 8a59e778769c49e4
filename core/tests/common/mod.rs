// tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use shopfront::accounts::{self, Registration};
use shopfront::flow::Workflows;
use shopfront::models::{Actor, AdminActor, ProductInput, ShippingDetails, UserRole};
use shopfront::{catalog, cart, db, pipelines, Product, ShopError};
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::Level;
use uuid::Uuid;

// --- Tracing ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

static UNIQUE: AtomicUsize = AtomicUsize::new(0);

fn next_suffix() -> usize {
  UNIQUE.fetch_add(1, Ordering::SeqCst)
}

// --- Store fixture ---

/// A migrated in-memory store with workflows registered and one admin.
pub struct TestStore {
  pub pool: SqlitePool,
  pub workflows: Workflows<ShopError>,
  pub admin: AdminActor,
}

impl TestStore {
  pub async fn new() -> Self {
    setup_tracing();
    let pool = db::in_memory().await.expect("in-memory database");
    Self::with_pool(pool).await
  }

  /// A store backed by a WAL database file with `max_connections` pooled
  /// connections, so transactions from different tasks really overlap.
  pub async fn on_disk(path: &Path, max_connections: u32) -> Self {
    setup_tracing();
    let url = format!("sqlite://{}", path.display());
    let pool = db::connect(&url, max_connections).await.expect("file database");
    db::migrate(&pool).await.expect("migrate file database");
    Self::with_pool(pool).await
  }

  async fn with_pool(pool: SqlitePool) -> Self {
    let workflows = Workflows::new();
    pipelines::register_all_pipelines(&workflows);

    let admin_actor = accounts::register(
      &pool,
      Registration {
        name: "Store Admin".into(),
        email: format!("admin{}@example.com", next_suffix()),
        password: "admin-password".into(),
      },
    )
    .await
    .expect("register admin");
    sqlx::query("UPDATE users SET role = 'ADMIN' WHERE id = ?")
      .bind(admin_actor.id)
      .execute(&pool)
      .await
      .expect("promote admin");
    let admin = Actor {
      role: UserRole::Admin,
      ..admin_actor
    }
    .require_admin()
    .expect("admin capability");

    TestStore { pool, workflows, admin }
  }

  pub async fn shopper(&self, name: &str) -> Actor {
    accounts::register(
      &self.pool,
      Registration {
        name: name.to_string(),
        email: format!("{}{}@example.com", name.to_lowercase().replace(' ', "."), next_suffix()),
        password: "shopper-password".into(),
      },
    )
    .await
    .expect("register shopper")
  }

  /// A published product with the given price and stock.
  pub async fn product(&self, name: &str, price_cents: i64, inventory: i64) -> Product {
    catalog::create_product(&self.pool, &self.admin, product_input(name, price_cents, inventory))
      .await
      .expect("create product")
  }

  pub async fn add_to_cart(&self, actor: &Actor, product_id: Uuid, quantity: i64) -> Result<shopfront::CartItem, ShopError> {
    cart::add_item(&self.workflows, &self.pool, actor, product_id, quantity).await
  }

  pub async fn inventory(&self, product_id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT inventory FROM products WHERE id = ?")
      .bind(product_id)
      .fetch_one(&self.pool)
      .await
      .expect("inventory")
  }

  /// Test-only backdoor for simulating stock changes that happen elsewhere.
  pub async fn set_inventory(&self, product_id: Uuid, inventory: i64) {
    sqlx::query("UPDATE products SET inventory = ? WHERE id = ?")
      .bind(inventory)
      .bind(product_id)
      .execute(&self.pool)
      .await
      .expect("set inventory");
  }

  pub async fn count(&self, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
      .fetch_one(&self.pool)
      .await
      .expect("count rows")
  }
}

pub fn product_input(name: &str, price_cents: i64, inventory: i64) -> ProductInput {
  let n = next_suffix();
  ProductInput {
    name: name.to_string(),
    slug: Some(format!("{} {}", name, n)),
    description: format!("{} for everyday use in the studio.", name),
    image_url: Some(format!("https://cdn.example.com/{}.jpg", n)),
    price_cents,
    compare_at_price_cents: None,
    sku: format!("SKU-{}", n),
    inventory,
    category_id: None,
    is_published: true,
  }
}

pub fn shipping() -> ShippingDetails {
  ShippingDetails {
    shipping_name: "Grace Hopper".into(),
    shipping_email: "grace@example.com".into(),
    shipping_phone: Some("+1 555 0100".into()),
    shipping_address1: "1 Compiler Lane".into(),
    shipping_address2: None,
    shipping_city: "Arlington".into(),
    shipping_state: "Virginia".into(),
    shipping_postal_code: "22201".into(),
    shipping_country: "US".into(),
    notes: Some("Leave at the front desk.".into()),
  }
}
