// shopfront/src/flow/error.rs
use thiserror::Error;

/// Failures raised by the pipeline runner itself, as opposed to the business
/// errors returned by step handlers.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("No pipeline registered for context type {type_name}")]
  NotRegistered { type_name: &'static str },

  #[error("Context type mismatch in registry dispatch (expected {expected_type})")]
  TypeMismatch { expected_type: &'static str },
}
