// tests/catalog_tests.rs
mod common;

use common::*;
use shopfront::{cart, catalog, checkout, CategoryInput, ProductFilter, ShopError};
use uuid::Uuid;

fn category(name: &str) -> CategoryInput {
  CategoryInput {
    name: name.to_string(),
    slug: None,
    description: Some(format!("All things {}.", name.to_lowercase())),
  }
}

#[tokio::test]
async fn slug_is_derived_from_the_name() {
  let store = TestStore::new().await;
  let mut input = product_input("Aurora Mechanical Keyboard!!", 14900, 3);
  input.slug = None;

  let product = catalog::create_product(&store.pool, &store.admin, input).await.unwrap();
  assert_eq!(product.slug, "aurora-mechanical-keyboard");

  let fetched = catalog::get_published_product(&store.pool, "aurora-mechanical-keyboard").await.unwrap();
  assert_eq!(fetched.id, product.id);
}

#[tokio::test]
async fn product_validation_rules() {
  let store = TestStore::new().await;

  let mut free = product_input("Free Sticker", 0, 1);
  free.slug = None;
  assert!(matches!(
    catalog::create_product(&store.pool, &store.admin, free).await,
    Err(ShopError::Validation(_))
  ));

  let mut discounted_up = product_input("Odd Discount", 1000, 1);
  discounted_up.compare_at_price_cents = Some(900);
  let err = catalog::create_product(&store.pool, &store.admin, discounted_up).await.unwrap_err();
  assert_eq!(err.user_message(), "Compare-at price must be greater than or equal to the price.");

  let mut negative = product_input("Negative Stock", 1000, -1);
  negative.slug = None;
  assert!(matches!(
    catalog::create_product(&store.pool, &store.admin, negative).await,
    Err(ShopError::Validation(_))
  ));

  let mut short = product_input("Short Copy", 1000, 1);
  short.description = "Too short".into();
  assert!(matches!(
    catalog::create_product(&store.pool, &store.admin, short).await,
    Err(ShopError::Validation(_))
  ));

  let mut unknown_category = product_input("Orphan", 1000, 1);
  unknown_category.category_id = Some(Uuid::new_v4());
  assert!(matches!(
    catalog::create_product(&store.pool, &store.admin, unknown_category).await,
    Err(ShopError::Validation(_))
  ));

  assert_eq!(store.count("products").await, 0);
}

#[tokio::test]
async fn duplicate_slug_and_sku_are_validation_errors() {
  let store = TestStore::new().await;
  let original = store.product("Steel Bottle", 2400, 5).await;

  let mut same_slug = product_input("Steel Bottle", 2400, 5);
  same_slug.slug = Some(original.slug.clone());
  let err = catalog::create_product(&store.pool, &store.admin, same_slug).await.unwrap_err();
  assert_eq!(err.user_message(), "A product with this slug already exists.");

  let mut same_sku = product_input("Steel Bottle Large", 2900, 5);
  same_sku.sku = original.sku.clone();
  let err = catalog::create_product(&store.pool, &store.admin, same_sku).await.unwrap_err();
  assert_eq!(err.user_message(), "A product with this SKU already exists.");
}

#[tokio::test]
async fn shopper_listing_hides_unpublished_and_filters() {
  let store = TestStore::new().await;
  let audio = catalog::create_category(&store.pool, &store.admin, category("Audio")).await.unwrap();
  assert_eq!(audio.slug, "audio");

  let mut speaker = product_input("Bookshelf Speaker", 19900, 4);
  speaker.category_id = Some(audio.id);
  let speaker = catalog::create_product(&store.pool, &store.admin, speaker).await.unwrap();
  let lamp = store.product("Arc Floor Lamp", 15900, 2).await;
  let mut draft = product_input("Draft Speaker", 9900, 4);
  draft.is_published = false;
  catalog::create_product(&store.pool, &store.admin, draft).await.unwrap();

  let all = catalog::list_published_products(&store.pool, &ProductFilter::default()).await.unwrap();
  let ids: Vec<_> = all.iter().map(|p| p.id).collect();
  assert_eq!(ids, vec![lamp.id, speaker.id]);

  let by_category = catalog::list_published_products(
    &store.pool,
    &ProductFilter {
      category_slug: Some("audio".into()),
      search_term: None,
    },
  )
  .await
  .unwrap();
  assert_eq!(by_category.len(), 1);
  assert_eq!(by_category[0].id, speaker.id);

  let searched = catalog::list_published_products(
    &store.pool,
    &ProductFilter {
      category_slug: None,
      search_term: Some("speaker".into()),
    },
  )
  .await
  .unwrap();
  assert_eq!(searched.len(), 1);
  assert_eq!(searched[0].id, speaker.id);

  let by_sku = catalog::list_published_products(
    &store.pool,
    &ProductFilter {
      category_slug: None,
      search_term: Some(lamp.sku.clone()),
    },
  )
  .await
  .unwrap();
  assert!(by_sku.iter().any(|p| p.id == lamp.id));

  let wildcard = catalog::list_published_products(
    &store.pool,
    &ProductFilter {
      category_slug: None,
      search_term: Some("%".into()),
    },
  )
  .await
  .unwrap();
  assert!(wildcard.is_empty());

  assert!(matches!(
    catalog::get_published_product(&store.pool, "draft-speaker").await,
    Err(ShopError::NotFound(_))
  ));
}

#[tokio::test]
async fn category_with_products_cannot_be_deleted() {
  let store = TestStore::new().await;
  let desk = catalog::create_category(&store.pool, &store.admin, category("Desk")).await.unwrap();
  let mut input = product_input("Desk Shelf", 5400, 3);
  input.category_id = Some(desk.id);
  let product = catalog::create_product(&store.pool, &store.admin, input).await.unwrap();

  let err = catalog::delete_category(&store.pool, &store.admin, desk.id).await.unwrap_err();
  assert!(matches!(err, ShopError::ConstraintViolation(_)));

  catalog::delete_product(&store.pool, &store.admin, product.id).await.unwrap();
  catalog::delete_category(&store.pool, &store.admin, desk.id).await.unwrap();
  assert!(matches!(
    catalog::delete_category(&store.pool, &store.admin, desk.id).await,
    Err(ShopError::NotFound(_))
  ));
}

#[tokio::test]
async fn duplicate_category_slug_is_rejected() {
  let store = TestStore::new().await;
  catalog::create_category(&store.pool, &store.admin, category("Lighting")).await.unwrap();
  let err = catalog::create_category(&store.pool, &store.admin, category("Lighting")).await.unwrap_err();
  assert_eq!(err.user_message(), "A category with this slug already exists.");
}

#[tokio::test]
async fn product_with_order_history_cannot_be_deleted() {
  let store = TestStore::new().await;
  let shopper = store.shopper("Kai").await;
  let sold = store.product("Sold Print", 3000, 5).await;
  let carted = store.product("Carted Print", 3000, 5).await;

  store.add_to_cart(&shopper, sold.id, 1).await.unwrap();
  checkout::place_order(&store.workflows, &store.pool, &shopper, shipping())
    .await
    .unwrap();
  store.add_to_cart(&shopper, carted.id, 1).await.unwrap();

  let err = catalog::delete_product(&store.pool, &store.admin, sold.id).await.unwrap_err();
  assert!(matches!(err, ShopError::ConstraintViolation(_)));

  // Only referenced by a cart: deleting it takes the cart line with it.
  catalog::delete_product(&store.pool, &store.admin, carted.id).await.unwrap();
  assert!(cart::list_items(&store.pool, &shopper).await.unwrap().is_empty());
}

#[tokio::test]
async fn adjust_inventory_never_goes_negative() {
  let store = TestStore::new().await;
  let product = store.product("Brass Paperweight", 2600, 3).await;

  let taken = catalog::adjust_inventory(&store.pool, product.id, -3).await.unwrap();
  assert_eq!(taken.map(|s| s.unit_price_cents), Some(2600));
  assert_eq!(store.inventory(product.id).await, 0);

  assert!(catalog::adjust_inventory(&store.pool, product.id, -1).await.unwrap().is_none());
  assert_eq!(store.inventory(product.id).await, 0);

  let restocked = catalog::restock_product(&store.pool, &store.admin, product.id, 7).await.unwrap();
  assert_eq!(restocked.inventory, 7);
  assert!(matches!(
    catalog::restock_product(&store.pool, &store.admin, product.id, 0).await,
    Err(ShopError::Validation(_))
  ));
}

#[tokio::test]
async fn admin_gate_refuses_shoppers() {
  let store = TestStore::new().await;
  let shopper = store.shopper("Lou").await;
  assert!(matches!(shopper.require_admin(), Err(ShopError::Forbidden)));
  assert_eq!(store.admin.actor().role, shopfront::UserRole::Admin);
}
