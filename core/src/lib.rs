// shopfront/src/lib.rs

//! Shopfront: the storefront core.
//!
//! A catalog of categories and products, per-user carts that are re-checked
//! against live stock on every write, an atomic checkout that turns a cart into
//! an immutable order, and the order ledger that records the result. Every
//! operation takes an explicit acting user (`Actor`, or `AdminActor` for
//! admin-only work) and a SQLite pool.
//!
//! The add-to-cart and checkout entry points run as named-step workflows on the
//! small runner in [`flow`]; register them once with
//! [`pipelines::register_all_pipelines`] and drive them through a
//! [`flow::Workflows`] registry.

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod db;
pub mod error;
pub mod flow;
pub mod ledger;
pub mod models;
pub mod money;
pub mod pipelines;
pub mod seed;
pub mod slug;

pub use crate::error::{Result, ShopError};
pub use crate::flow::{ContextData, FlowError, Pipeline, PipelineControl, PipelineResult, Workflows};
pub use crate::models::{
  Actor, AdminActor, CartItem, CartLine, Category, CategoryInput, Order, OrderItem, OrderStatus, OrderSummary,
  OrderWithItems, Product, ProductFilter, ProductInput, ProductSnapshot, ShippingDetails, User, UserRole,
};

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: i64 = 50;
