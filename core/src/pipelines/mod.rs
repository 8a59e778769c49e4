// shopfront/src/pipelines/mod.rs

//! The add-to-cart and checkout workflows, built on `crate::flow`.

use crate::error::ShopError;
use crate::flow::Workflows;

pub mod cart_pipeline;
pub mod checkout_pipeline;
pub mod contexts;

/// Registers every storefront workflow. Call once at startup, before serving.
pub fn register_all_pipelines(workflows: &Workflows<ShopError>) {
  tracing::info!("Registering storefront workflows...");

  cart_pipeline::register_add_to_cart_pipeline(workflows);
  checkout_pipeline::register_checkout_pipeline(workflows);

  tracing::info!("All storefront workflows registered.");
}
