// tests/flow_tests.rs
mod common;

use common::*;
use serial_test::serial;
use shopfront::flow::{ContextData, FlowError, Pipeline, PipelineControl, PipelineResult, Workflows};
use std::sync::atomic::{AtomicUsize, Ordering};

static HANDLER_EXEC_COUNTER: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Default)]
struct Trace {
  steps: Vec<String>,
  stop_at: Option<&'static str>,
}

#[derive(Debug, Default)]
struct OtherCtx;

#[derive(Debug, thiserror::Error)]
enum TestError {
  #[error("flow: {0}")]
  Flow(#[from] FlowError),
  #[error("handler failed: {0}")]
  Handler(String),
}

fn recording_pipeline(step_names: &[&'static str]) -> Pipeline<Trace, TestError> {
  let defs: Vec<(&str, bool)> = step_names.iter().map(|n| (*n, false)).collect();
  let mut p = Pipeline::<Trace, TestError>::new(&defs);
  for name in step_names {
    let name = *name;
    p.on(name, move |ctx: ContextData<Trace>| async move {
      HANDLER_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
      let mut guard = ctx.write();
      guard.steps.push(name.to_string());
      if guard.stop_at == Some(name) {
        return Ok::<_, TestError>(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    });
  }
  p
}

#[tokio::test]
#[serial]
async fn steps_run_in_declaration_order() {
  setup_tracing();
  HANDLER_EXEC_COUNTER.store(0, Ordering::SeqCst);
  let p = recording_pipeline(&["first", "second", "third"]);
  assert_eq!(p.step_names(), vec!["first", "second", "third"]);

  let ctx = ContextData::new(Trace::default());
  assert_eq!(p.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().steps, vec!["first", "second", "third"]);
  assert_eq!(HANDLER_EXEC_COUNTER.load(Ordering::SeqCst), 3);
}

#[tokio::test]
#[serial]
async fn stop_skips_the_rest() {
  setup_tracing();
  HANDLER_EXEC_COUNTER.store(0, Ordering::SeqCst);
  let p = recording_pipeline(&["first", "second", "third"]);

  let ctx = ContextData::new(Trace {
    stop_at: Some("second"),
    ..Trace::default()
  });
  assert_eq!(p.run(ctx.clone()).await.unwrap(), PipelineResult::Stopped);
  assert_eq!(ctx.read().steps, vec!["first", "second"]);
  assert_eq!(HANDLER_EXEC_COUNTER.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn handler_error_aborts_the_run() {
  setup_tracing();
  let mut p = Pipeline::<Trace, TestError>::new(&[("ok", false), ("boom", false), ("never", false)]);
  p.on("ok", |ctx: ContextData<Trace>| async move {
    ctx.write().steps.push("ok".into());
    Ok::<_, TestError>(PipelineControl::Continue)
  });
  p.on("boom", |_ctx: ContextData<Trace>| async move {
    Err::<PipelineControl, _>(TestError::Handler("intentional".into()))
  });
  p.on("never", |ctx: ContextData<Trace>| async move {
    ctx.write().steps.push("never".into());
    Ok::<_, TestError>(PipelineControl::Continue)
  });

  let ctx = ContextData::new(Trace::default());
  match p.run(ctx.clone()).await {
    Err(TestError::Handler(msg)) => assert_eq!(msg, "intentional"),
    other => panic!("expected handler failure, got {:?}", other),
  }
  assert_eq!(ctx.read().steps, vec!["ok"]);
}

#[tokio::test]
async fn missing_handlers() {
  setup_tracing();
  let mut p = Pipeline::<Trace, TestError>::new(&[("optional", true), ("required", false)]);
  let ctx = ContextData::new(Trace::default());
  match p.run(ctx.clone()).await {
    Err(TestError::Flow(FlowError::HandlerMissing { step_name })) => assert_eq!(step_name, "required"),
    other => panic!("expected HandlerMissing, got {:?}", other),
  }

  p.on("required", |_ctx: ContextData<Trace>| async move { Ok::<_, TestError>(PipelineControl::Continue) });
  assert_eq!(p.run(ctx).await.unwrap(), PipelineResult::Completed);
}

#[test]
#[should_panic(expected = "not declared")]
fn registering_an_undeclared_step_panics() {
  let mut p = Pipeline::<Trace, TestError>::new(&[("real", false)]);
  p.on("imaginary", |_ctx: ContextData<Trace>| async move { Ok::<_, TestError>(PipelineControl::Continue) });
}

#[tokio::test]
async fn registry_dispatches_by_context_type() {
  setup_tracing();
  let workflows = Workflows::<TestError>::new();
  assert!(!workflows.is_registered::<Trace>());
  workflows.register(recording_pipeline(&["only"]));
  assert!(workflows.is_registered::<Trace>());

  let ctx = ContextData::new(Trace::default());
  assert_eq!(workflows.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().steps, vec!["only"]);

  match workflows.run(ContextData::new(OtherCtx)).await {
    Err(TestError::Flow(FlowError::NotRegistered { type_name })) => assert!(type_name.contains("OtherCtx")),
    other => panic!("expected NotRegistered, got {:?}", other),
  }
}

#[tokio::test]
async fn storefront_workflows_are_wired() {
  let store = TestStore::new().await;
  assert!(store.workflows.is_registered::<shopfront::pipelines::contexts::AddToCartCtxData>());
  assert!(store.workflows.is_registered::<shopfront::pipelines::contexts::CheckoutCtxData>());
}
