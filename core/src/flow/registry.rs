// shopfront/src/flow/registry.rs

//! `Workflows<E>`: a registry of pipelines keyed by the type of data they run on.
//! Request handlers build a context value and hand it to `run`; the registry picks
//! the pipeline registered for that context type.

use crate::flow::context_data::ContextData;
use crate::flow::control::PipelineResult;
use crate::flow::error::FlowError;
use crate::flow::pipeline::Pipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, Level};

#[async_trait]
trait ErasedRunner<E>: Send + Sync
where
  E: std::error::Error + Send + Sync + 'static,
{
  /// `ctx_obj` holds a `ContextData<T>` for the runner's `T`.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, E>;
}

#[async_trait]
impl<T, E> ErasedRunner<E> for Pipeline<T, E>
where
  T: Send + Sync + 'static,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, E> {
    let ctx_data = ctx_obj
      .downcast::<ContextData<T>>()
      .map_err(|_| {
        E::from(FlowError::TypeMismatch {
          expected_type: std::any::type_name::<ContextData<T>>(),
        })
      })?;
    self.run(*ctx_data).await
  }
}

pub struct Workflows<E>
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  registry: RwLock<HashMap<TypeId, Arc<dyn ErasedRunner<E>>>>,
}

impl<E> Workflows<E>
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      registry: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `pipeline` for context type `T`, replacing any earlier registration.
  pub fn register<T>(&self, pipeline: Pipeline<T, E>)
  where
    T: Send + Sync + 'static,
  {
    event!(Level::DEBUG, context_type = %std::any::type_name::<T>(), "Registering pipeline.");
    self.registry.write().insert(TypeId::of::<T>(), Arc::new(pipeline));
  }

  pub fn is_registered<T: Send + Sync + 'static>(&self) -> bool {
    self.registry.read().contains_key(&TypeId::of::<T>())
  }

  pub async fn run<T>(&self, ctx_data: ContextData<T>) -> Result<PipelineResult, E>
  where
    T: Send + Sync + 'static,
  {
    let runner = self.registry.read().get(&TypeId::of::<T>()).cloned().ok_or_else(|| {
      let type_name = std::any::type_name::<T>();
      event!(Level::ERROR, context_type = %type_name, "No pipeline registered.");
      E::from(FlowError::NotRegistered { type_name })
    })?;

    runner.run_erased(Box::new(ctx_data)).await
  }
}

impl<E> Default for Workflows<E>
where
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
