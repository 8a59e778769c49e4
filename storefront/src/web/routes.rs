// shopfront_app/src/web/routes.rs

use actix_web::{web, HttpResponse};

use crate::web::handlers::{
  account_handlers, admin_handlers, auth_handlers, cart_handlers, checkout_handlers, product_handlers,
};

async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// JSON read endpoints live under `/api`; form actions sit at the page paths
/// they redirect between.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/api")
        .route("/products", web::get().to(product_handlers::list_products_handler))
        .route("/products/{slug}", web::get().to(product_handlers::get_product_handler))
        .route("/categories", web::get().to(product_handlers::list_categories_handler))
        .route("/me", web::get().to(account_handlers::me_handler))
        .route("/cart", web::get().to(cart_handlers::view_cart_handler))
        .route("/account/orders", web::get().to(account_handlers::list_my_orders_handler))
        .route("/account/orders/{order_id}", web::get().to(account_handlers::get_my_order_handler))
        .service(
          web::scope("/admin")
            .route("/overview", web::get().to(admin_handlers::overview_handler))
            .route("/products", web::get().to(admin_handlers::list_products_handler))
            .route("/products/{product_id}", web::get().to(admin_handlers::get_product_handler))
            .route("/orders", web::get().to(admin_handlers::list_orders_handler))
            .route("/users", web::get().to(admin_handlers::list_users_handler)),
        ),
    )
    // Session
    .route("/register", web::post().to(auth_handlers::register_handler))
    .route("/login", web::post().to(auth_handlers::login_handler))
    .route("/logout", web::post().to(auth_handlers::logout_handler))
    // Cart and checkout
    .service(
      web::scope("/cart")
        .route("/add", web::post().to(cart_handlers::add_to_cart_handler))
        .route("/update", web::post().to(cart_handlers::update_cart_quantity_handler))
        .route("/remove", web::post().to(cart_handlers::remove_cart_item_handler)),
    )
    .route("/checkout", web::post().to(checkout_handlers::checkout_handler))
    // Admin form actions
    .service(
      web::scope("/admin")
        .route("/categories", web::post().to(admin_handlers::create_category_handler))
        .route("/categories/{category_id}", web::post().to(admin_handlers::update_category_handler))
        .route(
          "/categories/{category_id}/delete",
          web::post().to(admin_handlers::delete_category_handler),
        )
        .route("/products", web::post().to(admin_handlers::create_product_handler))
        .route("/products/{product_id}", web::post().to(admin_handlers::update_product_handler))
        .route("/products/{product_id}/delete", web::post().to(admin_handlers::delete_product_handler))
        .route("/products/{product_id}/restock", web::post().to(admin_handlers::restock_product_handler))
        .route("/orders/{order_id}/status", web::post().to(admin_handlers::update_order_status_handler))
        .route("/users/{user_id}/role", web::post().to(admin_handlers::set_user_role_handler)),
    );
}
