// shopfront/src/catalog.rs

//! Catalog Store: categories and products, and the inventory counter that
//! checkout protects.
//!
//! Shopper reads only ever see published products. Every mutation other than
//! the conditional inventory adjustment demands an `AdminActor`.

use crate::error::{translate_constraint, Result, ShopError};
use crate::models::{AdminActor, Category, CategoryInput, Product, ProductFilter, ProductInput, ProductSnapshot};
use crate::slug::derive_slug;

use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.slug, p.description, p.image_url, p.price_cents, \
   p.compare_at_price_cents, p.sku, p.inventory, p.is_published, p.category_id, p.created_at, p.updated_at";

// --- Shopper reads ---

#[instrument(skip(pool), err(Display))]
pub async fn get_published_product(pool: &SqlitePool, slug: &str) -> Result<Product> {
  let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.slug = ? AND p.is_published = 1");
  sqlx::query_as::<_, Product>(&sql)
    .bind(slug)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ShopError::NotFound("Product not found.".to_string()))
}

/// Published products, newest first. `search_term` matches name, description
/// or SKU by case-insensitive substring; `category_slug` narrows to one category.
#[instrument(skip(pool), err(Display))]
pub async fn list_published_products(pool: &SqlitePool, filter: &ProductFilter) -> Result<Vec<Product>> {
  let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
    "SELECT {PRODUCT_COLUMNS} FROM products p LEFT JOIN categories c ON c.id = p.category_id WHERE p.is_published = 1"
  ));

  if let Some(category_slug) = filter.category_slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    qb.push(" AND c.slug = ").push_bind(category_slug.to_string());
  }

  if let Some(term) = filter.search_term.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    let pattern = format!("%{}%", escape_like(term));
    qb.push(" AND (p.name LIKE ")
      .push_bind(pattern.clone())
      .push(" ESCAPE '\\' OR p.description LIKE ")
      .push_bind(pattern.clone())
      .push(" ESCAPE '\\' OR p.sku LIKE ")
      .push_bind(pattern)
      .push(" ESCAPE '\\')");
  }

  qb.push(" ORDER BY p.created_at DESC, p.rowid DESC");

  let products = qb.build_query_as::<Product>().fetch_all(pool).await?;
  Ok(products)
}

fn escape_like(term: &str) -> String {
  let mut escaped = String::with_capacity(term.len());
  for ch in term.chars() {
    if matches!(ch, '%' | '_' | '\\') {
      escaped.push('\\');
    }
    escaped.push(ch);
  }
  escaped
}

#[instrument(skip(pool), err(Display))]
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<Category>> {
  let categories = sqlx::query_as::<_, Category>(
    "SELECT id, name, slug, description, created_at, updated_at FROM categories ORDER BY name ASC",
  )
  .fetch_all(pool)
  .await?;
  Ok(categories)
}

// --- Inventory ---

/// Conditional inventory adjustment: adds `delta` to the product's inventory
/// only if the result stays non-negative, in one statement.
///
/// Returns the product's name, slug, image and current price as read by that
/// same statement, or `None` when the guard rejected the write (or the product
/// does not exist). Pass a transaction as `executor` to make the adjustment part
/// of a larger atomic unit.
pub async fn adjust_inventory<'e, E>(executor: E, product_id: Uuid, delta: i64) -> Result<Option<ProductSnapshot>>
where
  E: Executor<'e, Database = Sqlite>,
{
  let snapshot = sqlx::query_as::<_, ProductSnapshot>(
    "UPDATE products SET inventory = inventory + ?1, updated_at = ?2 \
     WHERE id = ?3 AND inventory + ?1 >= 0 \
     RETURNING id AS product_id, name, slug, image_url, price_cents AS unit_price_cents",
  )
  .bind(delta)
  .bind(Utc::now())
  .bind(product_id)
  .fetch_optional(executor)
  .await?;
  Ok(snapshot)
}

/// Admin restock: adds `amount` units and returns the updated product.
#[instrument(skip(pool, admin), fields(admin_id = %admin.id()), err(Display))]
pub async fn restock_product(pool: &SqlitePool, admin: &AdminActor, product_id: Uuid, amount: i64) -> Result<Product> {
  if amount <= 0 {
    return Err(ShopError::Validation("Restock amount must be at least 1.".to_string()));
  }
  if adjust_inventory(pool, product_id, amount).await?.is_none() {
    return Err(ShopError::NotFound("Product not found.".to_string()));
  }
  info!(%product_id, amount, "Product restocked.");
  get_product(pool, admin, product_id).await
}

// --- Admin: categories ---

#[instrument(skip(pool, admin, input), fields(admin_id = %admin.id()), err(Display))]
pub async fn create_category(pool: &SqlitePool, admin: &AdminActor, input: CategoryInput) -> Result<Category> {
  let input = input.normalized();
  input.validate()?;
  let slug = checked_slug(input.slug.as_deref(), &input.name)?;
  let now = Utc::now();

  let category = sqlx::query_as::<_, Category>(
    "INSERT INTO categories (id, name, slug, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?) \
     RETURNING id, name, slug, description, created_at, updated_at",
  )
  .bind(Uuid::new_v4())
  .bind(&input.name)
  .bind(&slug)
  .bind(&input.description)
  .bind(now)
  .bind(now)
  .fetch_one(pool)
  .await
  .map_err(category_write_error)?;

  info!(category_id = %category.id, slug = %category.slug, "Category created.");
  Ok(category)
}

#[instrument(skip(pool, admin, input), fields(admin_id = %admin.id()), err(Display))]
pub async fn update_category(
  pool: &SqlitePool,
  admin: &AdminActor,
  category_id: Uuid,
  input: CategoryInput,
) -> Result<Category> {
  let input = input.normalized();
  input.validate()?;
  let slug = checked_slug(input.slug.as_deref(), &input.name)?;

  let category = sqlx::query_as::<_, Category>(
    "UPDATE categories SET name = ?, slug = ?, description = ?, updated_at = ? WHERE id = ? \
     RETURNING id, name, slug, description, created_at, updated_at",
  )
  .bind(&input.name)
  .bind(&slug)
  .bind(&input.description)
  .bind(Utc::now())
  .bind(category_id)
  .fetch_optional(pool)
  .await
  .map_err(category_write_error)?
  .ok_or_else(|| ShopError::NotFound("Category not found.".to_string()))?;

  info!(%category_id, "Category updated.");
  Ok(category)
}

/// Fails with `ConstraintViolation` while any product still references the category.
#[instrument(skip(pool, admin), fields(admin_id = %admin.id()), err(Display))]
pub async fn delete_category(pool: &SqlitePool, admin: &AdminActor, category_id: Uuid) -> Result<()> {
  let result = sqlx::query("DELETE FROM categories WHERE id = ?")
    .bind(category_id)
    .execute(pool)
    .await
    .map_err(|e| {
      translate_constraint(
        e,
        |m| ShopError::ConstraintViolation(m.to_string()),
        "This category still has products. Reassign them before deleting it.",
      )
    })?;

  if result.rows_affected() == 0 {
    return Err(ShopError::NotFound("Category not found.".to_string()));
  }
  info!(%category_id, "Category deleted.");
  Ok(())
}

fn category_write_error(err: sqlx::Error) -> ShopError {
  translate_constraint(
    err,
    |_| ShopError::Validation("A category with this slug already exists.".to_string()),
    "The category is still referenced.",
  )
}

// --- Admin: products ---

/// Every product, published or not, newest first.
#[instrument(skip(pool, admin), fields(admin_id = %admin.id()), err(Display))]
pub async fn list_all_products(pool: &SqlitePool, admin: &AdminActor) -> Result<Vec<Product>> {
  let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p ORDER BY p.created_at DESC, p.rowid DESC");
  let products = sqlx::query_as::<_, Product>(&sql).fetch_all(pool).await?;
  Ok(products)
}

#[instrument(skip(pool, admin), fields(admin_id = %admin.id()), err(Display))]
pub async fn get_product(pool: &SqlitePool, admin: &AdminActor, product_id: Uuid) -> Result<Product> {
  let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = ?");
  sqlx::query_as::<_, Product>(&sql)
    .bind(product_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ShopError::NotFound("Product not found.".to_string()))
}

#[instrument(skip(pool, admin, input), fields(admin_id = %admin.id(), sku = %input.sku), err(Display))]
pub async fn create_product(pool: &SqlitePool, admin: &AdminActor, input: ProductInput) -> Result<Product> {
  let input = checked_product_input(pool, input).await?;
  let slug = checked_slug(input.slug.as_deref(), &input.name)?;
  let now = Utc::now();

  let product = sqlx::query_as::<_, Product>(
    "INSERT INTO products (id, name, slug, description, image_url, price_cents, compare_at_price_cents, sku, \
       inventory, is_published, category_id, created_at, updated_at) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
     RETURNING id, name, slug, description, image_url, price_cents, compare_at_price_cents, sku, inventory, \
       is_published, category_id, created_at, updated_at",
  )
  .bind(Uuid::new_v4())
  .bind(&input.name)
  .bind(&slug)
  .bind(&input.description)
  .bind(&input.image_url)
  .bind(input.price_cents)
  .bind(input.compare_at_price_cents)
  .bind(&input.sku)
  .bind(input.inventory)
  .bind(input.is_published)
  .bind(input.category_id)
  .bind(now)
  .bind(now)
  .fetch_one(pool)
  .await
  .map_err(product_write_error)?;

  info!(product_id = %product.id, slug = %product.slug, "Product created.");
  Ok(product)
}

/// Replaces every editable field, inventory included.
#[instrument(skip(pool, admin, input), fields(admin_id = %admin.id()), err(Display))]
pub async fn update_product(
  pool: &SqlitePool,
  admin: &AdminActor,
  product_id: Uuid,
  input: ProductInput,
) -> Result<Product> {
  let input = checked_product_input(pool, input).await?;
  let slug = checked_slug(input.slug.as_deref(), &input.name)?;

  let product = sqlx::query_as::<_, Product>(
    "UPDATE products SET name = ?, slug = ?, description = ?, image_url = ?, price_cents = ?, \
       compare_at_price_cents = ?, sku = ?, inventory = ?, is_published = ?, category_id = ?, updated_at = ? \
     WHERE id = ? \
     RETURNING id, name, slug, description, image_url, price_cents, compare_at_price_cents, sku, inventory, \
       is_published, category_id, created_at, updated_at",
  )
  .bind(&input.name)
  .bind(&slug)
  .bind(&input.description)
  .bind(&input.image_url)
  .bind(input.price_cents)
  .bind(input.compare_at_price_cents)
  .bind(&input.sku)
  .bind(input.inventory)
  .bind(input.is_published)
  .bind(input.category_id)
  .bind(Utc::now())
  .bind(product_id)
  .fetch_optional(pool)
  .await
  .map_err(product_write_error)?
  .ok_or_else(|| ShopError::NotFound("Product not found.".to_string()))?;

  info!(%product_id, "Product updated.");
  Ok(product)
}

/// Fails with `ConstraintViolation` when the product appears in any order.
/// Cart items pointing at it are removed with it.
#[instrument(skip(pool, admin), fields(admin_id = %admin.id()), err(Display))]
pub async fn delete_product(pool: &SqlitePool, admin: &AdminActor, product_id: Uuid) -> Result<()> {
  let result = sqlx::query("DELETE FROM products WHERE id = ?")
    .bind(product_id)
    .execute(pool)
    .await
    .map_err(|e| {
      translate_constraint(
        e,
        |m| ShopError::ConstraintViolation(m.to_string()),
        "This product has order history and cannot be deleted. Unpublish it instead.",
      )
    })?;

  if result.rows_affected() == 0 {
    return Err(ShopError::NotFound("Product not found.".to_string()));
  }
  info!(%product_id, "Product deleted.");
  Ok(())
}

async fn checked_product_input(pool: &SqlitePool, input: ProductInput) -> Result<ProductInput> {
  let input = input.normalized();
  input.validate()?;

  if let Some(category_id) = input.category_id {
    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE id = ?")
      .bind(category_id)
      .fetch_one(pool)
      .await?;
    if exists == 0 {
      warn!(%category_id, "Product references an unknown category.");
      return Err(ShopError::Validation("The selected category does not exist.".to_string()));
    }
  }
  Ok(input)
}

fn product_write_error(err: sqlx::Error) -> ShopError {
  translate_constraint(
    err,
    |message| {
      if message.contains("products.sku") {
        ShopError::Validation("A product with this SKU already exists.".to_string())
      } else {
        ShopError::Validation("A product with this slug already exists.".to_string())
      }
    },
    "The selected category does not exist.",
  )
}

fn checked_slug(explicit: Option<&str>, name: &str) -> Result<String> {
  let slug = derive_slug(explicit, name);
  if slug.is_empty() {
    return Err(ShopError::Validation(
      "Could not derive a slug. Use letters or digits in the name or slug.".to_string(),
    ));
  }
  Ok(slug)
}
