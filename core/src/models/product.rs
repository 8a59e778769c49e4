// shopfront/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub slug: String,
  pub description: String,
  pub image_url: Option<String>,
  /// Minor currency units.
  pub price_cents: i64,
  pub compare_at_price_cents: Option<i64>,
  pub sku: String,
  pub inventory: i64,
  pub is_published: bool,
  pub category_id: Option<Uuid>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Shopper-facing listing filter. Both fields are optional and combine with AND.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
  pub category_slug: Option<String>,
  pub search_term: Option<String>,
}

/// Admin input for creating or replacing a product.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_compare_at_price"))]
pub struct ProductInput {
  #[validate(length(min = 2, max = 160))]
  pub name: String,
  #[validate(length(min = 2, max = 160))]
  pub slug: Option<String>,
  #[validate(length(min = 10, max = 4000))]
  pub description: String,
  #[validate(url)]
  pub image_url: Option<String>,
  #[validate(range(min = 1))]
  pub price_cents: i64,
  #[validate(range(min = 1))]
  pub compare_at_price_cents: Option<i64>,
  #[validate(length(min = 2, max = 100))]
  pub sku: String,
  #[validate(range(min = 0))]
  pub inventory: i64,
  pub category_id: Option<Uuid>,
  pub is_published: bool,
}

impl ProductInput {
  pub fn normalized(self) -> Self {
    Self {
      name: self.name.trim().to_string(),
      slug: crate::models::non_blank(self.slug),
      description: self.description.trim().to_string(),
      image_url: crate::models::non_blank(self.image_url),
      sku: self.sku.trim().to_string(),
      ..self
    }
  }
}

fn validate_compare_at_price(input: &ProductInput) -> Result<(), ValidationError> {
  match input.compare_at_price_cents {
    Some(compare_at) if compare_at < input.price_cents => {
      let mut err = ValidationError::new("compare_at_below_price");
      err.message = Some("Compare-at price must be greater than or equal to the price.".into());
      Err(err)
    }
    _ => Ok(()),
  }
}
