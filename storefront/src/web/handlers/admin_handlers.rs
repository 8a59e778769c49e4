// shopfront_app/src/web/handlers/admin_handlers.rs

//! Admin surface. Reads answer with JSON; mutations are form posts that
//! redirect back to the matching admin page.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::RequireAdmin;
use crate::web::handlers::cart_handlers::parse_uuid;
use crate::web::responses::form_outcome;
use shopfront::models::{CategoryInput, OrderStatus, ProductInput, UserRole};
use shopfront::{accounts, catalog, ledger, money, ShopError};

const PRODUCTS_PAGE: &str = "/admin/products";
const CATEGORIES_PAGE: &str = "/admin/categories";
const ORDERS_PAGE: &str = "/admin/orders";
const USERS_PAGE: &str = "/admin/users";

/// Product form as posted by the admin editor. Prices arrive in major units
/// ("12.50") and the publish checkbox is only present when ticked.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductForm {
  pub name: String,
  pub slug: String,
  pub description: String,
  pub image_url: String,
  pub price: String,
  pub compare_at_price: String,
  pub sku: String,
  pub inventory: String,
  pub category_id: String,
  pub is_published: Option<String>,
}

impl ProductForm {
  fn into_input(self) -> Result<ProductInput, ShopError> {
    let compare_at_price_cents = match self.compare_at_price.trim() {
      "" => None,
      raw => Some(money::parse_major_units(raw)?),
    };
    let inventory = self
      .inventory
      .trim()
      .parse::<i64>()
      .map_err(|_| ShopError::Validation("Inventory must be a whole number.".to_string()))?;
    let category_id = match self.category_id.trim() {
      "" => None,
      raw => Some(parse_uuid(raw, "category")?),
    };

    Ok(ProductInput {
      name: self.name,
      slug: Some(self.slug),
      description: self.description,
      image_url: Some(self.image_url),
      price_cents: money::parse_major_units(&self.price)?,
      compare_at_price_cents,
      sku: self.sku,
      inventory,
      category_id,
      is_published: matches!(self.is_published.as_deref(), Some("on" | "true" | "1")),
    })
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RestockForm {
  pub amount: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrderStatusForm {
  pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserRoleForm {
  pub role: String,
}

// --- Reads ---

pub async fn overview_handler(app_state: web::Data<AppState>, admin: RequireAdmin) -> Result<HttpResponse, AppError> {
  let stats = ledger::overview(&app_state.db_pool, &admin.0).await?;
  Ok(HttpResponse::Ok().json(stats))
}

pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  admin: RequireAdmin,
) -> Result<HttpResponse, AppError> {
  let products = catalog::list_all_products(&app_state.db_pool, &admin.0).await?;
  let categories = catalog::list_categories(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(json!({ "products": products, "categories": categories })))
}

pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  product_id: web::Path<Uuid>,
  admin: RequireAdmin,
) -> Result<HttpResponse, AppError> {
  let product = catalog::get_product(&app_state.db_pool, &admin.0, product_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(product))
}

pub async fn list_orders_handler(app_state: web::Data<AppState>, admin: RequireAdmin) -> Result<HttpResponse, AppError> {
  let orders = ledger::list_all_orders(&app_state.db_pool, &admin.0).await?;
  Ok(HttpResponse::Ok().json(orders))
}

pub async fn list_users_handler(app_state: web::Data<AppState>, admin: RequireAdmin) -> Result<HttpResponse, AppError> {
  let users = accounts::list_users(&app_state.db_pool, &admin.0).await?;
  Ok(HttpResponse::Ok().json(users))
}

// --- Categories ---

#[instrument(name = "handler::admin_create_category", skip_all)]
pub async fn create_category_handler(
  app_state: web::Data<AppState>,
  form: web::Form<CategoryInput>,
  admin: RequireAdmin,
) -> Result<HttpResponse, AppError> {
  let outcome = async {
    catalog::create_category(&app_state.db_pool, &admin.0, form.into_inner()).await?;
    Ok::<_, AppError>(CATEGORIES_PAGE.to_string())
  }
  .await;
  form_outcome(outcome, CATEGORIES_PAGE)
}

#[instrument(name = "handler::admin_update_category", skip(app_state, form, admin))]
pub async fn update_category_handler(
  app_state: web::Data<AppState>,
  category_id: web::Path<Uuid>,
  form: web::Form<CategoryInput>,
  admin: RequireAdmin,
) -> Result<HttpResponse, AppError> {
  let outcome = async {
    catalog::update_category(&app_state.db_pool, &admin.0, category_id.into_inner(), form.into_inner()).await?;
    Ok::<_, AppError>(CATEGORIES_PAGE.to_string())
  }
  .await;
  form_outcome(outcome, CATEGORIES_PAGE)
}

#[instrument(name = "handler::admin_delete_category", skip(app_state, admin))]
pub async fn delete_category_handler(
  app_state: web::Data<AppState>,
  category_id: web::Path<Uuid>,
  admin: RequireAdmin,
) -> Result<HttpResponse, AppError> {
  let outcome = async {
    catalog::delete_category(&app_state.db_pool, &admin.0, category_id.into_inner()).await?;
    Ok::<_, AppError>(CATEGORIES_PAGE.to_string())
  }
  .await;
  form_outcome(outcome, CATEGORIES_PAGE)
}

// --- Products ---

#[instrument(name = "handler::admin_create_product", skip_all)]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  form: web::Form<ProductForm>,
  admin: RequireAdmin,
) -> Result<HttpResponse, AppError> {
  let outcome = async {
    let input = form.into_inner().into_input()?;
    let product = catalog::create_product(&app_state.db_pool, &admin.0, input).await?;
    Ok::<_, AppError>(format!("{}?created={}", PRODUCTS_PAGE, product.id))
  }
  .await;
  form_outcome(outcome, PRODUCTS_PAGE)
}

#[instrument(name = "handler::admin_update_product", skip(app_state, form, admin))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  product_id: web::Path<Uuid>,
  form: web::Form<ProductForm>,
  admin: RequireAdmin,
) -> Result<HttpResponse, AppError> {
  let product_id = product_id.into_inner();
  let edit_page = format!("{}/{}", PRODUCTS_PAGE, product_id);
  let outcome = async {
    let input = form.into_inner().into_input()?;
    catalog::update_product(&app_state.db_pool, &admin.0, product_id, input).await?;
    Ok::<_, AppError>(PRODUCTS_PAGE.to_string())
  }
  .await;
  form_outcome(outcome, &edit_page)
}

#[instrument(name = "handler::admin_delete_product", skip(app_state, admin))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  product_id: web::Path<Uuid>,
  admin: RequireAdmin,
) -> Result<HttpResponse, AppError> {
  let outcome = async {
    catalog::delete_product(&app_state.db_pool, &admin.0, product_id.into_inner()).await?;
    Ok::<_, AppError>(PRODUCTS_PAGE.to_string())
  }
  .await;
  form_outcome(outcome, PRODUCTS_PAGE)
}

#[instrument(name = "handler::admin_restock_product", skip(app_state, form, admin))]
pub async fn restock_product_handler(
  app_state: web::Data<AppState>,
  product_id: web::Path<Uuid>,
  form: web::Form<RestockForm>,
  admin: RequireAdmin,
) -> Result<HttpResponse, AppError> {
  let outcome = async {
    let amount = form
      .amount
      .trim()
      .parse::<i64>()
      .map_err(|_| ShopError::Validation("Restock amount must be a whole number.".to_string()))?;
    catalog::restock_product(&app_state.db_pool, &admin.0, product_id.into_inner(), amount).await?;
    Ok::<_, AppError>(PRODUCTS_PAGE.to_string())
  }
  .await;
  form_outcome(outcome, PRODUCTS_PAGE)
}

// --- Orders and users ---

#[instrument(name = "handler::admin_update_order_status", skip(app_state, form, admin))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  order_id: web::Path<Uuid>,
  form: web::Form<OrderStatusForm>,
  admin: RequireAdmin,
) -> Result<HttpResponse, AppError> {
  let outcome = async {
    let status: OrderStatus = form.status.parse()?;
    ledger::update_order_status(&app_state.db_pool, &admin.0, order_id.into_inner(), status).await?;
    Ok::<_, AppError>(ORDERS_PAGE.to_string())
  }
  .await;
  form_outcome(outcome, ORDERS_PAGE)
}

#[instrument(name = "handler::admin_set_user_role", skip(app_state, form, admin))]
pub async fn set_user_role_handler(
  app_state: web::Data<AppState>,
  user_id: web::Path<Uuid>,
  form: web::Form<UserRoleForm>,
  admin: RequireAdmin,
) -> Result<HttpResponse, AppError> {
  let outcome = async {
    let role: UserRole = form.role.parse()?;
    accounts::set_user_role(&app_state.db_pool, &admin.0, user_id.into_inner(), role).await?;
    Ok::<_, AppError>(USERS_PAGE.to_string())
  }
  .await;
  form_outcome(outcome, USERS_PAGE)
}
