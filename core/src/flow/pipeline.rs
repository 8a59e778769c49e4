// shopfront/src/flow/pipeline.rs

//! Named-step pipelines: a fixed, ordered list of steps, each with one or more
//! async handlers operating on a shared `ContextData<T>`.

use crate::flow::context_data::ContextData;
use crate::flow::control::{PipelineControl, PipelineResult};
use crate::flow::error::FlowError;
use std::future::Future;
use std::pin::Pin;
use tracing::{event, instrument, span, Instrument, Level};

/// A boxed step handler. It receives a clone of the run's `ContextData<T>` and
/// resolves to a control signal or the pipeline's error type.
pub type Handler<T, E> =
  Box<dyn Fn(ContextData<T>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, E>> + Send>> + Send + Sync>;

struct Step<T, E>
where
  T: Send + Sync + 'static,
{
  name: String,
  optional: bool,
  handlers: Vec<Handler<T, E>>,
}

pub struct Pipeline<T, E>
where
  T: Send + Sync + 'static,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  steps: Vec<Step<T, E>>,
}

impl<T, E> Pipeline<T, E>
where
  T: Send + Sync + 'static,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Declares the steps, in execution order, as `(name, optional)` pairs.
  pub fn new(step_defs: &[(&str, bool)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional)| Step {
        name: (*name).to_string(),
        optional: *optional,
        handlers: Vec::new(),
      })
      .collect();
    Self { steps }
  }

  /// Appends a handler to a declared step.
  ///
  /// Panics when the step was never declared: that is a wiring mistake caught at
  /// startup, not something a request can trigger.
  pub fn on<F, HandlerErr>(&mut self, step_name: &str, handler_fn: impl Fn(ContextData<T>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = Result<PipelineControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<E> + 'static,
  {
    let step = self
      .steps
      .iter_mut()
      .find(|s| s.name == step_name)
      .unwrap_or_else(|| panic!("Pipeline setup error: step '{}' is not declared.", step_name));

    step.handlers.push(Box::new(move |ctx_data| {
      let fut = handler_fn(ctx_data);
      Box::pin(async move { fut.await.map_err(Into::into) })
    }));
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(context_type = %std::any::type_name::<T>(), num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<T>) -> Result<PipelineResult, E> {
    for (step_idx, step) in self.steps.iter().enumerate() {
      if step.handlers.is_empty() {
        if step.optional {
          event!(Level::DEBUG, step_name = %step.name, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(Level::ERROR, step_name = %step.name, "Non-optional step has no handlers.");
        return Err(E::from(FlowError::HandlerMissing {
          step_name: step.name.clone(),
        }));
      }

      let step_span = span!(Level::INFO, "pipeline_step", step_name = %step.name, step_index = step_idx);
      for handler_fn in &step.handlers {
        match handler_fn(ctx_data.clone()).instrument(step_span.clone()).await {
          Ok(PipelineControl::Continue) => {}
          Ok(PipelineControl::Stop) => {
            event!(Level::INFO, step_name = %step.name, "Pipeline stopped by handler.");
            return Ok(PipelineResult::Stopped);
          }
          Err(e) => {
            event!(Level::WARN, step_name = %step.name, error = %e, "Step handler failed.");
            return Err(e);
          }
        }
      }
    }

    Ok(PipelineResult::Completed)
  }
}
