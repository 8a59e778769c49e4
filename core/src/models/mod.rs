// shopfront/src/models/mod.rs

//! Row types for the five storefront tables plus users, and the value types that
//! travel between the core operations.

pub mod cart_item;
pub mod category;
pub mod order;
pub mod order_item;
pub mod product;
pub mod user;

pub use cart_item::{CartItem, CartLine};
pub use category::{Category, CategoryInput};
pub use order::{Order, OrderStatus, OrderSummary, OrderWithItems, ShippingDetails};
pub use order_item::{OrderItem, ProductSnapshot};
pub use product::{Product, ProductFilter, ProductInput};
pub use user::{Actor, AdminActor, User, UserRole};

/// Trims an optional form value; blank strings count as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
