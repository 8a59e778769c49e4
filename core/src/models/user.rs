// shopfront/src/models/user.rs

use crate::error::ShopError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
  User,
  Admin,
}

impl FromStr for UserRole {
  type Err = ShopError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_uppercase().as_str() {
      "USER" => Ok(UserRole::User),
      "ADMIN" => Ok(UserRole::Admin),
      other => Err(ShopError::Validation(format!("Unknown role '{}'.", other))),
    }
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing)] // Never send password hash to client
  pub password_hash: String,
  pub role: UserRole,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// The acting user, passed explicitly into every core operation instead of being
/// looked up from ambient request state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Actor {
  pub id: Uuid,
  pub role: UserRole,
  pub email: String,
  pub name: String,
}

impl Actor {
  /// The single admin gate. Every admin-only operation takes an `AdminActor`, and
  /// this is the only way to obtain one.
  pub fn require_admin(&self) -> Result<AdminActor, ShopError> {
    match self.role {
      UserRole::Admin => Ok(AdminActor(self.clone())),
      UserRole::User => {
        tracing::warn!(user_id = %self.id, "Admin capability requested by non-admin user.");
        Err(ShopError::Forbidden)
      }
    }
  }
}

impl From<User> for Actor {
  fn from(user: User) -> Self {
    Actor {
      id: user.id,
      role: user.role,
      email: user.email,
      name: user.name,
    }
  }
}

/// Proof that the holder passed `Actor::require_admin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminActor(Actor);

impl AdminActor {
  pub fn actor(&self) -> &Actor {
    &self.0
  }

  pub fn id(&self) -> Uuid {
    self.0.id
  }
}
