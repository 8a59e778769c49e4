// shopfront/src/seed.rs

//! Demo data for a fresh database: an admin account and a small catalog.

use crate::accounts::{self, Registration};
use crate::catalog;
use crate::error::Result;
use crate::models::{Actor, CategoryInput, ProductInput, UserRole};

use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct SeedOptions {
  pub admin_email: String,
  pub admin_password: String,
  pub admin_name: String,
}

struct DemoProduct {
  category: usize,
  name: &'static str,
  description: &'static str,
  price_cents: i64,
  compare_at_price_cents: Option<i64>,
  sku: &'static str,
  inventory: i64,
}

const DEMO_CATEGORIES: [(&str, &str); 3] = [
  ("Keyboards", "Mechanical and low-profile keyboards."),
  ("Desk Setup", "Lamps, mats and stands for a tidy desk."),
  ("Audio", "Headphones and speakers."),
];

const DEMO_PRODUCTS: [DemoProduct; 5] = [
  DemoProduct {
    category: 0,
    name: "Aurora Mechanical Keyboard",
    description: "Hot-swappable 75% board with tactile switches and a milled aluminium case.",
    price_cents: 14900,
    compare_at_price_cents: Some(17900),
    sku: "KB-AURORA-75",
    inventory: 25,
  },
  DemoProduct {
    category: 0,
    name: "Slate Low-Profile Keyboard",
    description: "Quiet scissor-switch keyboard with multi-device Bluetooth pairing.",
    price_cents: 7900,
    compare_at_price_cents: None,
    sku: "KB-SLATE-LP",
    inventory: 40,
  },
  DemoProduct {
    category: 1,
    name: "Halo Desk Lamp",
    description: "Dimmable LED lamp with adjustable colour temperature and a weighted base.",
    price_cents: 5900,
    compare_at_price_cents: None,
    sku: "DS-HALO-LAMP",
    inventory: 15,
  },
  DemoProduct {
    category: 1,
    name: "Felt Desk Mat",
    description: "Wool felt desk mat, 90 by 40 centimetres, with a non-slip underside.",
    price_cents: 3500,
    compare_at_price_cents: Some(4200),
    sku: "DS-FELT-MAT",
    inventory: 60,
  },
  DemoProduct {
    category: 2,
    name: "Studio Headphones",
    description: "Closed-back monitoring headphones with a detachable coiled cable.",
    price_cents: 12900,
    compare_at_price_cents: None,
    sku: "AU-STUDIO-HP",
    inventory: 10,
  },
];

/// Creates the admin account if its email is unused, then fills a catalog
/// with no categories and no products with demo categories and published products. Safe to run on every
/// start.
#[instrument(skip(pool, options), err(Display))]
pub async fn seed_database(pool: &SqlitePool, options: &SeedOptions) -> Result<()> {
  let admin_email = options.admin_email.trim().to_lowercase();
  let existing = sqlx::query_as::<_, Actor>("SELECT id, role, email, name FROM users WHERE email = ?")
    .bind(&admin_email)
    .fetch_optional(pool)
    .await?;

  let admin = match existing {
    Some(actor) => actor,
    None => {
      let registration = Registration {
        name: options.admin_name.trim().to_string(),
        email: admin_email.clone(),
        password: options.admin_password.clone(),
      };
      accounts::create_user(pool, &registration, UserRole::Admin).await?
    }
  };
  let admin = match admin.require_admin() {
    Ok(admin) => admin,
    Err(_) => {
      warn!("Seed admin email belongs to a non-admin account; skipping demo catalog.");
      return Ok(());
    }
  };

  let catalog_rows = sqlx::query_scalar::<_, i64>("SELECT (SELECT COUNT(*) FROM products) + (SELECT COUNT(*) FROM categories)")
    .fetch_one(pool)
    .await?;
  if catalog_rows > 0 {
    info!(catalog_rows, "Catalog already populated; skipping demo data.");
    return Ok(());
  }

  let mut category_ids = Vec::with_capacity(DEMO_CATEGORIES.len());
  for (name, description) in DEMO_CATEGORIES {
    let category = catalog::create_category(
      pool,
      &admin,
      CategoryInput {
        name: name.to_string(),
        slug: None,
        description: Some(description.to_string()),
      },
    )
    .await?;
    category_ids.push(category.id);
  }

  for demo in &DEMO_PRODUCTS {
    catalog::create_product(
      pool,
      &admin,
      ProductInput {
        name: demo.name.to_string(),
        slug: None,
        description: demo.description.to_string(),
        image_url: None,
        price_cents: demo.price_cents,
        compare_at_price_cents: demo.compare_at_price_cents,
        sku: demo.sku.to_string(),
        inventory: demo.inventory,
        category_id: category_ids.get(demo.category).copied(),
        is_published: true,
      },
    )
    .await?;
  }

  info!(
    categories = DEMO_CATEGORIES.len(),
    products = DEMO_PRODUCTS.len(),
    "Demo catalog seeded."
  );
  Ok(())
}
