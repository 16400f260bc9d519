// src/handler.rs

//! Named job handlers.
//!
//! The scheduler addresses handlers by name. A [`HandlerRegistry`] is built
//! once at startup and maps each name to the handler that serves it; the
//! subprocess [`JobRunner`](crate::exec::JobRunner) registers under
//! [`EXECUTOR_JOB_HANDLER`].

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use crate::errors::{JobExecError, Result};
use crate::types::{ExecutionResult, TriggerRequest};

/// Name the subprocess runner is registered under.
pub const EXECUTOR_JOB_HANDLER: &str = "executorJobHandler";

/// A unit of work the scheduler can trigger.
///
/// Implementations must turn every expected failure into an
/// [`ExecutionResult::Failed`] rather than panic.
pub trait JobHandler: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: &'a TriggerRequest,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + 'a>>;
}

/// Mapping from handler name to handler.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<String, Arc<dyn JobHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`, returning any handler it replaces.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn JobHandler>,
    ) -> Option<Arc<dyn JobHandler>> {
        let name = name.into();
        debug!(handler = %name, "registering job handler");
        self.handlers.insert(name, handler)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn JobHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Run `request` on the handler registered as `name`.
    pub async fn dispatch(&self, name: &str, request: &TriggerRequest) -> Result<ExecutionResult> {
        let handler = self
            .get(name)
            .ok_or_else(|| JobExecError::UnknownHandler(name.to_string()))?;
        Ok(handler.execute(request).await)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
