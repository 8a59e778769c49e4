// shopfront_app/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use crate::web::responses::form_outcome;
use crate::web::session::safe_internal_path;
use shopfront::{cart, money, ShopError};

#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
  #[serde(default)]
  pub product_id: String,
  pub quantity: Option<String>,
  /// Page to return to with an error, e.g. the product page.
  pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CartQuantityForm {
  #[serde(default)]
  pub cart_item_id: String,
  #[serde(default)]
  pub quantity: String,
}

#[derive(Debug, Deserialize)]
pub struct CartRemoveForm {
  #[serde(default)]
  pub cart_item_id: String,
}

pub(crate) fn parse_uuid(raw: &str, what: &str) -> Result<Uuid, ShopError> {
  Uuid::parse_str(raw.trim()).map_err(|_| ShopError::Validation(format!("Invalid {}.", what)))
}

pub(crate) fn parse_quantity(raw: Option<&str>) -> Result<i64, ShopError> {
  match raw.map(str::trim).filter(|s| !s.is_empty()) {
    None => Ok(1),
    Some(value) => value
      .parse::<i64>()
      .map_err(|_| ShopError::Validation("Quantity must be a whole number.".to_string())),
  }
}

#[instrument(name = "handler::view_cart", skip(app_state, auth_user), fields(user_id = %auth_user.0.id))]
pub async fn view_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let lines = cart::list_items(&app_state.db_pool, &auth_user.0).await?;
  let subtotal_cents: i64 = lines.iter().map(|l| l.line_total_cents()).sum();
  Ok(HttpResponse::Ok().json(json!({
    "items": lines,
    "subtotalCents": subtotal_cents,
    "subtotal": money::format_minor_units(subtotal_cents),
  })))
}

#[instrument(name = "handler::add_to_cart", skip(app_state, form, auth_user), fields(user_id = %auth_user.0.id))]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  form: web::Form<AddToCartForm>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let form = form.into_inner();
  let origin = safe_internal_path(form.return_to.as_deref(), "/products");

  let outcome = async {
    let product_id = parse_uuid(&form.product_id, "product")?;
    let quantity = parse_quantity(form.quantity.as_deref())?;
    let item = cart::add_item(&app_state.workflows, &app_state.db_pool, &auth_user.0, product_id, quantity).await?;
    info!(cart_item_id = %item.id, quantity = item.quantity, "Added to cart.");
    Ok::<_, AppError>("/cart".to_string())
  }
  .await;

  form_outcome(outcome, &origin)
}

#[instrument(name = "handler::update_cart_quantity", skip(app_state, form, auth_user), fields(user_id = %auth_user.0.id))]
pub async fn update_cart_quantity_handler(
  app_state: web::Data<AppState>,
  form: web::Form<CartQuantityForm>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let outcome = async {
    let cart_item_id = parse_uuid(&form.cart_item_id, "cart item")?;
    let quantity = form
      .quantity
      .trim()
      .parse::<i64>()
      .map_err(|_| ShopError::Validation("Invalid quantity.".to_string()))?;
    cart::set_item_quantity(&app_state.db_pool, &auth_user.0, cart_item_id, quantity).await?;
    Ok::<_, AppError>("/cart".to_string())
  }
  .await;

  form_outcome(outcome, "/cart")
}

#[instrument(name = "handler::remove_cart_item", skip(app_state, form, auth_user), fields(user_id = %auth_user.0.id))]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  form: web::Form<CartRemoveForm>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let outcome = async {
    let cart_item_id = parse_uuid(&form.cart_item_id, "cart item")?;
    cart::remove_item(&app_state.db_pool, &auth_user.0, cart_item_id).await?;
    Ok::<_, AppError>("/cart".to_string())
  }
  .await;

  form_outcome(outcome, "/cart")
}
