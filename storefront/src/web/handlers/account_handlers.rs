// shopfront_app/src/web/handlers/account_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::{AuthenticatedUser, CurrentUser};
use shopfront::ledger;

pub async fn me_handler(current_user: CurrentUser) -> HttpResponse {
  HttpResponse::Ok().json(json!({ "user": current_user.0 }))
}

#[instrument(name = "handler::list_my_orders", skip(app_state, auth_user), fields(user_id = %auth_user.0.id))]
pub async fn list_my_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = ledger::list_orders_for_user(&app_state.db_pool, &auth_user.0).await?;
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::get_my_order", skip(app_state, auth_user), fields(user_id = %auth_user.0.id))]
pub async fn get_my_order_handler(
  app_state: web::Data<AppState>,
  order_id: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let order = ledger::get_order_for_user(&app_state.db_pool, &auth_user.0, order_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(order))
}
