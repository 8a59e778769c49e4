// shopfront/src/models/category.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
  pub id: Uuid,
  pub name: String,
  pub slug: String,
  pub description: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Admin input for creating or replacing a category. `slug` is derived from
/// `name` when absent.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct CategoryInput {
  #[validate(length(min = 2, max = 80))]
  pub name: String,
  #[validate(length(min = 2, max = 100))]
  pub slug: Option<String>,
  #[validate(length(max = 300))]
  pub description: Option<String>,
}

impl CategoryInput {
  /// Trims every field and turns blank optionals into `None`.
  pub fn normalized(self) -> Self {
    Self {
      name: self.name.trim().to_string(),
      slug: crate::models::non_blank(self.slug),
      description: crate::models::non_blank(self.description),
    }
  }
}
