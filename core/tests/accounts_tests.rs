// tests/accounts_tests.rs
mod common;

use common::*;
use shopfront::accounts::{self, Registration};
use shopfront::seed::{self, SeedOptions};
use shopfront::{catalog, ProductFilter, ShopError, UserRole};

fn registration(email: &str) -> Registration {
  Registration {
    name: "Sam Rivera".into(),
    email: email.into(),
    password: "long-enough-password".into(),
  }
}

#[tokio::test]
async fn register_then_authenticate() {
  let store = TestStore::new().await;
  let actor = accounts::register(&store.pool, registration("  Sam@Example.com ")).await.unwrap();
  assert_eq!(actor.email, "sam@example.com");
  assert_eq!(actor.role, UserRole::User);

  let signed_in = accounts::authenticate(&store.pool, "SAM@example.com", "long-enough-password")
    .await
    .unwrap();
  assert_eq!(signed_in, actor);

  let wrong = accounts::authenticate(&store.pool, "sam@example.com", "not-the-password").await.unwrap_err();
  let unknown = accounts::authenticate(&store.pool, "nobody@example.com", "long-enough-password")
    .await
    .unwrap_err();
  assert!(matches!(wrong, ShopError::Unauthorized(_)));
  assert_eq!(wrong.user_message(), unknown.user_message());
}

#[tokio::test]
async fn registration_rules() {
  let store = TestStore::new().await;
  accounts::register(&store.pool, registration("taken@example.com")).await.unwrap();

  let dup = accounts::register(&store.pool, registration("TAKEN@example.com")).await.unwrap_err();
  assert_eq!(dup.user_message(), "An account with this email exists.");

  let mut short = registration("short@example.com");
  short.password = "short".into();
  let err = accounts::register(&store.pool, short).await.unwrap_err();
  assert_eq!(err.user_message(), "Password must be between 8 and 100 characters.");

  assert!(matches!(
    accounts::register(&store.pool, registration("not-an-email")).await,
    Err(ShopError::Validation(_))
  ));
}

#[tokio::test]
async fn role_changes_and_self_demotion_guard() {
  let store = TestStore::new().await;
  let shopper = store.shopper("Tess").await;

  let promoted = accounts::set_user_role(&store.pool, &store.admin, shopper.id, UserRole::Admin)
    .await
    .unwrap();
  assert_eq!(promoted.role, UserRole::Admin);
  assert!(promoted.require_admin().is_ok());

  let err = accounts::set_user_role(&store.pool, &store.admin, store.admin.id(), UserRole::User)
    .await
    .unwrap_err();
  assert!(matches!(err, ShopError::Validation(_)));

  let users = accounts::list_users(&store.pool, &store.admin).await.unwrap();
  assert_eq!(users.len(), 2);
  assert_eq!(users[0].id, shopper.id);

  let found = accounts::find_actor(&store.pool, shopper.id).await.unwrap();
  assert_eq!(found.map(|a| a.role), Some(UserRole::Admin));
}

#[tokio::test]
async fn seeding_is_idempotent() {
  let store = TestStore::new().await;
  let options = SeedOptions {
    admin_email: "owner@example.com".into(),
    admin_password: "owner-password".into(),
    admin_name: "Shop Owner".into(),
  };

  seed::seed_database(&store.pool, &options).await.unwrap();
  let first = catalog::list_published_products(&store.pool, &ProductFilter::default()).await.unwrap();
  assert_eq!(first.len(), 5);

  seed::seed_database(&store.pool, &options).await.unwrap();
  assert_eq!(store.count("products").await, 5);
  assert_eq!(store.count("categories").await, 3);

  let owner = accounts::authenticate(&store.pool, "owner@example.com", "owner-password")
    .await
    .unwrap();
  assert_eq!(owner.role, UserRole::Admin);
}
