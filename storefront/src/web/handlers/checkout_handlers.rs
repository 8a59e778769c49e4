// shopfront_app/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;
use crate::web::responses::{redirect_with_error, see_other};
use shopfront::{checkout, ShippingDetails, ShopError};

/// Failures the shopper fixes on the cart page rather than the checkout form.
fn origin_for(err: &ShopError) -> &'static str {
  match err {
    ShopError::EmptyCart | ShopError::ProductUnavailable { .. } | ShopError::InsufficientInventory { .. } => "/cart",
    _ => "/checkout",
  }
}

#[instrument(name = "handler::checkout", skip(app_state, form, auth_user), fields(user_id = %auth_user.0.id))]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  form: web::Form<ShippingDetails>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  match checkout::place_order(&app_state.workflows, &app_state.db_pool, &auth_user.0, form.into_inner()).await {
    Ok(order_id) => {
      info!(%order_id, "Checkout completed.");
      Ok(see_other(&format!("/account?order={}", order_id)))
    }
    Err(err) => Ok(redirect_with_error(origin_for(&err), &err)),
  }
}
