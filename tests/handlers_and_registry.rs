// tests/handlers_and_registry.rs
mod common;
use crate::common::builders::{write_script, ConfigFileBuilder, TriggerRequestBuilder};
use crate::common::{init_tracing, with_timeout, Harness};

use std::error::Error;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use jobexec::errors::JobExecError;
use jobexec::exec::ProcessRegistry;
use jobexec::fs::mock::MockFileSystem;
use jobexec::fs::{FileSystem, RealFileSystem};
use jobexec::handler::{HandlerRegistry, JobHandler, EXECUTOR_JOB_HANDLER};
use jobexec::types::{ExecutionResult, TriggerRequest};

type TestResult = Result<(), Box<dyn Error>>;

/// A handler that fails every job with a fixed code.
struct AlwaysFails(i32);

impl JobHandler for AlwaysFails {
    fn execute<'a>(
        &'a self,
        _request: &'a TriggerRequest,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + 'a>> {
        let code = self.0;
        Box::pin(async move { ExecutionResult::from_exit_code(code) })
    }
}

#[tokio::test]
async fn dispatch_routes_by_name() -> TestResult {
    init_tracing();

    let scripts = tempfile::tempdir()?;
    let json_dir = tempfile::tempdir()?;
    let script = write_script(scripts.path(), "ok.sh", "exit 0");
    let cfg = ConfigFileBuilder::new(script).temp_dir(json_dir.path()).build();
    let h = Harness::new(cfg);
    assert_eq!(h.runner.config().interpreter, "sh");

    let mut handlers = HandlerRegistry::new();
    handlers.register(EXECUTOR_JOB_HANDLER, Arc::new(h.runner.clone()));
    handlers.register("alwaysFails", Arc::new(AlwaysFails(5)));

    assert_eq!(
        handlers.names().collect::<Vec<_>>(),
        vec!["alwaysFails", EXECUTOR_JOB_HANDLER]
    );

    let request = TriggerRequestBuilder::new("{}").build();
    let ok = with_timeout(handlers.dispatch(EXECUTOR_JOB_HANDLER, &request)).await?;
    assert_eq!(ok, ExecutionResult::Success);

    let failed = handlers.dispatch("alwaysFails", &request).await?;
    assert_eq!(failed.exit_code(), 5);
    Ok(())
}

#[tokio::test]
async fn unknown_handler_is_an_error() {
    let handlers = HandlerRegistry::new();
    let request = TriggerRequestBuilder::new("{}").build();

    match handlers.dispatch("nope", &request).await {
        Err(JobExecError::UnknownHandler(name)) => assert_eq!(name, "nope"),
        other => panic!("Expected UnknownHandler, got: {:?}", other),
    }
}

#[test]
fn registering_twice_returns_the_previous_handler() {
    let mut handlers = HandlerRegistry::new();
    assert!(handlers.register("x", Arc::new(AlwaysFails(1))).is_none());
    assert!(handlers.register("x", Arc::new(AlwaysFails(2))).is_some());
    assert_eq!(handlers.names().count(), 1);
    assert!(handlers.get("x").is_some());
    assert!(handlers.get("y").is_none());
}

#[test]
fn registry_tracks_and_forgets_pids() {
    let registry = ProcessRegistry::new();
    assert!(registry.is_empty());

    registry.insert(100, "/tmp/a.conf");
    registry.insert(200, "/tmp/b.conf");
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.get(100), Some("/tmp/a.conf".into()));

    let shared = registry.clone();
    assert_eq!(shared.remove(100), Some("/tmp/a.conf".into()));
    assert_eq!(registry.get(100), None);
    assert_eq!(registry.len(), 1);
}

#[test]
fn release_deletes_the_tracked_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("jobTmp-x.conf");
    std::fs::write(&path, "{}")?;

    let registry = ProcessRegistry::new();
    registry.insert(42, &path);

    let released = registry.release(42, &RealFileSystem);
    assert_eq!(released.as_deref(), Some(path.as_path()));
    assert!(!path.exists());
    assert!(registry.is_empty());

    assert_eq!(registry.release(42, &RealFileSystem), None);
    Ok(())
}

#[test]
fn release_tolerates_an_already_deleted_file() -> TestResult {
    let fs = MockFileSystem::new();
    fs.create_dir_all("/json".as_ref())?;
    fs.write("/json/a.conf".as_ref(), b"{}")?;

    let registry = ProcessRegistry::new();
    registry.insert(1, "/json/a.conf");
    registry.insert(2, "/json/gone.conf");

    assert!(registry.release(1, &fs).is_some());
    assert!(registry.release(2, &fs).is_some());
    assert_eq!(fs.file_count(), 0);
    assert!(registry.is_empty());
    Ok(())
}
