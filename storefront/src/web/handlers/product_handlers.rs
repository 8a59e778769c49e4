// shopfront_app/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;
use shopfront::{catalog, ProductFilter};

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
  pub category: Option<String>,
  pub q: Option<String>,
}

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ProductListQuery>,
) -> Result<HttpResponse, AppError> {
  let query = query.into_inner();
  let filter = ProductFilter {
    category_slug: query.category,
    search_term: query.q,
  };
  let products = catalog::list_published_products(&app_state.db_pool, &filter).await?;
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::get_product", skip(app_state))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  slug: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product = catalog::get_published_product(&app_state.db_pool, &slug).await?;
  Ok(HttpResponse::Ok().json(product))
}

pub async fn list_categories_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let categories = catalog::list_categories(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(categories))
}
