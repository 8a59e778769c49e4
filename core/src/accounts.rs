// shopfront/src/accounts.rs

//! User accounts: registration, credential checks, and admin role management.
//! Passwords are stored as Argon2 PHC strings.

use crate::error::{translate_constraint, Result, ShopError};
use crate::models::{Actor, AdminActor, User, UserRole};

use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Registration {
  #[validate(length(min = 2, max = 120))]
  pub name: String,
  #[validate(email)]
  pub email: String,
  #[validate(length(min = 8, max = 100, message = "Password must be between 8 and 100 characters."))]
  pub password: String,
}

/// Hashes a plain-text password with a fresh random salt.
#[instrument(name = "accounts::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String> {
  if password.is_empty() {
    return Err(ShopError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|argon_err| {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      ShopError::Internal(format!("Password hashing failed: {}", argon_err))
    })
}

/// `Ok(false)` on a mismatch; `Err` only when the stored hash is unreadable.
#[instrument(name = "accounts::verify_password", skip_all, err(Display))]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool> {
  let parsed_hash = PasswordHash::new(stored_hash).map_err(|parse_err| {
    error!(error = %parse_err, "Stored password hash is malformed.");
    ShopError::Internal(format!("Invalid stored password hash: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password mismatch.");
      Ok(false)
    }
    Err(other) => {
      error!(error = %other, "Argon2 verification failed.");
      Err(ShopError::Internal(format!("Password verification failed: {}", other)))
    }
  }
}

/// Creates a regular user. Emails are stored trimmed and lowercased.
#[instrument(skip(pool, registration), err(Display))]
pub async fn register(pool: &SqlitePool, registration: Registration) -> Result<Actor> {
  let registration = Registration {
    name: registration.name.trim().to_string(),
    email: registration.email.trim().to_lowercase(),
    password: registration.password,
  };
  registration.validate()?;

  create_user(pool, &registration, UserRole::User).await
}

/// Inserts a user with the given role. Used by registration and seeding.
pub(crate) async fn create_user(pool: &SqlitePool, registration: &Registration, role: UserRole) -> Result<Actor> {
  let password_hash = hash_password(&registration.password)?;
  let now = Utc::now();

  let actor = sqlx::query_as::<_, Actor>(
    "INSERT INTO users (id, name, email, password_hash, role, created_at, updated_at) \
     VALUES (?, ?, ?, ?, ?, ?, ?) \
     RETURNING id, role, email, name",
  )
  .bind(Uuid::new_v4())
  .bind(&registration.name)
  .bind(&registration.email)
  .bind(&password_hash)
  .bind(role)
  .bind(now)
  .bind(now)
  .fetch_one(pool)
  .await
  .map_err(|e| {
    translate_constraint(
      e,
      |_| ShopError::Validation("An account with this email exists.".to_string()),
      "Account could not be created.",
    )
  })?;

  info!(user_id = %actor.id, role = ?actor.role, "User account created.");
  Ok(actor)
}

/// Checks an email and password pair. Unknown emails and wrong passwords fail
/// identically.
#[instrument(skip(pool, email, password), err(Display))]
pub async fn authenticate(pool: &SqlitePool, email: &str, password: &str) -> Result<Actor> {
  let email = email.trim().to_lowercase();
  let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");
  let user = sqlx::query_as::<_, User>(&sql).bind(&email).fetch_optional(pool).await?;

  let invalid = || ShopError::Unauthorized("Invalid credentials.".to_string());
  let user = match user {
    Some(user) => user,
    None => {
      warn!("Sign-in attempt for unknown email.");
      return Err(invalid());
    }
  };

  if !verify_password(&user.password_hash, password)? {
    warn!(user_id = %user.id, "Sign-in attempt with wrong password.");
    return Err(invalid());
  }

  info!(user_id = %user.id, "User signed in.");
  Ok(Actor::from(user))
}

/// Resolves a session's user id to an `Actor`; `None` if the user is gone.
pub async fn find_actor(pool: &SqlitePool, user_id: Uuid) -> Result<Option<Actor>> {
  let actor = sqlx::query_as::<_, Actor>("SELECT id, role, email, name FROM users WHERE id = ?")
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
  Ok(actor)
}

#[instrument(skip(pool, admin), fields(admin_id = %admin.id()), err(Display))]
pub async fn list_users(pool: &SqlitePool, admin: &AdminActor) -> Result<Vec<User>> {
  let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, rowid DESC");
  let users = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
  Ok(users)
}

/// Changes a user's role. An admin cannot revoke their own admin role.
#[instrument(skip(pool, admin), fields(admin_id = %admin.id()), err(Display))]
pub async fn set_user_role(pool: &SqlitePool, admin: &AdminActor, user_id: Uuid, role: UserRole) -> Result<Actor> {
  if user_id == admin.id() && role != UserRole::Admin {
    warn!("Admin attempted to remove their own admin role.");
    return Err(ShopError::Validation("You cannot remove your own admin role.".to_string()));
  }

  let actor = sqlx::query_as::<_, Actor>(
    "UPDATE users SET role = ?, updated_at = ? WHERE id = ? RETURNING id, role, email, name",
  )
  .bind(role)
  .bind(Utc::now())
  .bind(user_id)
  .fetch_optional(pool)
  .await?
  .ok_or_else(|| ShopError::NotFound("User not found.".to_string()))?;

  info!(%user_id, role = ?role, "User role updated.");
  Ok(actor)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hashes_verify_and_reject() {
    let hash = hash_password("correct horse").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password(&hash, "correct horse").unwrap());
    assert!(!verify_password(&hash, "battery staple").unwrap());
  }

  #[test]
  fn garbage_hash_is_an_internal_error() {
    assert!(matches!(verify_password("not-a-phc-string", "whatever"), Err(ShopError::Internal(_))));
  }

  #[test]
  fn empty_password_is_rejected() {
    assert!(matches!(hash_password(""), Err(ShopError::Validation(_))));
  }
}
