// shopfront/src/flow/mod.rs

//! A small async workflow runner: ordered, named steps over shared context data,
//! plus a registry keyed by context type. The cart and checkout workflows in
//! `crate::pipelines` are built on it.

pub mod context_data;
pub mod control;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use error::FlowError;
pub use pipeline::{Handler, Pipeline};
pub use registry::Workflows;
