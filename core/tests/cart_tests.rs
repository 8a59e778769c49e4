// tests/cart_tests.rs
mod common;

use common::*;
use shopfront::{cart, ShopError};
use uuid::Uuid;

#[tokio::test]
async fn adding_the_same_product_merges_quantities() {
  let store = TestStore::new().await;
  let shopper = store.shopper("Ana").await;
  let product = store.product("Graphite Pencil Set", 800, 10).await;

  let first = store.add_to_cart(&shopper, product.id, 2).await.unwrap();
  let second = store.add_to_cart(&shopper, product.id, 3).await.unwrap();

  assert_eq!(first.id, second.id);
  assert_eq!(second.quantity, 5);
  let lines = cart::list_items(&store.pool, &shopper).await.unwrap();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].quantity, 5);
  assert_eq!(lines[0].unit_price_cents, 800);
  assert_eq!(lines[0].line_total_cents(), 4000);
}

#[tokio::test]
async fn merged_quantity_over_stock_is_rejected_without_writing() {
  let store = TestStore::new().await;
  let shopper = store.shopper("Ben").await;
  let product = store.product("Marble Bookends", 4200, 4).await;

  store.add_to_cart(&shopper, product.id, 3).await.unwrap();
  let err = store.add_to_cart(&shopper, product.id, 2).await.unwrap_err();

  match err {
    ShopError::InsufficientInventory { requested, available, .. } => {
      assert_eq!((requested, available), (5, 4));
    }
    other => panic!("expected InsufficientInventory, got {:?}", other),
  }
  let lines = cart::list_items(&store.pool, &shopper).await.unwrap();
  assert_eq!(lines[0].quantity, 3);
}

#[tokio::test]
async fn add_rejects_bad_quantities_and_missing_products() {
  let store = TestStore::new().await;
  let shopper = store.shopper("Cat").await;
  let product = store.product("Paper Tray", 1100, 100).await;

  assert!(matches!(
    store.add_to_cart(&shopper, product.id, 0).await,
    Err(ShopError::Validation(_))
  ));
  assert!(matches!(
    store.add_to_cart(&shopper, product.id, 51).await,
    Err(ShopError::Validation(_))
  ));
  assert!(matches!(
    store.add_to_cart(&shopper, Uuid::new_v4(), 1).await,
    Err(ShopError::NotFound(_))
  ));
  assert_eq!(store.count("cart_items").await, 0);
}

#[tokio::test]
async fn unpublished_products_cannot_be_added() {
  let store = TestStore::new().await;
  let shopper = store.shopper("Dan").await;
  let mut input = product_input("Prototype Lamp", 9900, 3);
  input.is_published = false;
  let hidden = shopfront::catalog::create_product(&store.pool, &store.admin, input).await.unwrap();

  let err = store.add_to_cart(&shopper, hidden.id, 1).await.unwrap_err();
  assert!(matches!(err, ShopError::NotFound(_)));
}

#[tokio::test]
async fn set_quantity_respects_stock_and_ownership() {
  let store = TestStore::new().await;
  let owner = store.shopper("Eli").await;
  let stranger = store.shopper("Fay").await;
  let product = store.product("Leather Mouse Pad", 3900, 6).await;
  let item = store.add_to_cart(&owner, product.id, 1).await.unwrap();

  let updated = cart::set_item_quantity(&store.pool, &owner, item.id, 6).await.unwrap();
  assert_eq!(updated.quantity, 6);

  assert!(matches!(
    cart::set_item_quantity(&store.pool, &owner, item.id, 7).await,
    Err(ShopError::InsufficientInventory { .. })
  ));
  assert!(matches!(
    cart::set_item_quantity(&store.pool, &owner, item.id, 0).await,
    Err(ShopError::Validation(_))
  ));

  let foreign = cart::set_item_quantity(&store.pool, &stranger, item.id, 1).await.unwrap_err();
  let missing = cart::set_item_quantity(&store.pool, &stranger, Uuid::new_v4(), 1).await.unwrap_err();
  assert!(matches!(foreign, ShopError::NotFound(_)));
  assert_eq!(foreign.user_message(), missing.user_message());

  let lines = cart::list_items(&store.pool, &owner).await.unwrap();
  assert_eq!(lines[0].quantity, 6);
}

#[tokio::test]
async fn remove_is_idempotent_and_scoped_to_the_owner() {
  let store = TestStore::new().await;
  let owner = store.shopper("Gus").await;
  let stranger = store.shopper("Hana").await;
  let product = store.product("Cable Organizer", 1400, 9).await;
  let other = store.product("Monitor Light Bar", 6500, 9).await;
  let item = store.add_to_cart(&owner, product.id, 2).await.unwrap();
  store.add_to_cart(&owner, other.id, 1).await.unwrap();

  cart::remove_item(&store.pool, &stranger, item.id).await.unwrap();
  assert_eq!(cart::list_items(&store.pool, &owner).await.unwrap().len(), 2);

  cart::remove_item(&store.pool, &owner, item.id).await.unwrap();
  let after_first = cart::list_items(&store.pool, &owner).await.unwrap();
  cart::remove_item(&store.pool, &owner, item.id).await.unwrap();
  let after_second = cart::list_items(&store.pool, &owner).await.unwrap();

  assert_eq!(after_first.len(), 1);
  assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn carts_are_private_per_user() {
  let store = TestStore::new().await;
  let first = store.shopper("Ike").await;
  let second = store.shopper("Jun").await;
  let product = store.product("Velvet Pen Roll", 2100, 20).await;

  store.add_to_cart(&first, product.id, 4).await.unwrap();
  store.add_to_cart(&second, product.id, 1).await.unwrap();

  assert_eq!(cart::list_items(&store.pool, &first).await.unwrap()[0].quantity, 4);
  assert_eq!(cart::list_items(&store.pool, &second).await.unwrap()[0].quantity, 1);
}
