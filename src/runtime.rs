// src/runtime.rs

use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::core::{ExplainError, Result};

/// Clonable handle onto a tokio runtime used for explanation and model tasks.
///
/// Clones share identity; see [`Executor::same_as`].
#[derive(Clone)]
pub struct Executor {
    inner: Arc<ExecutorInner>,
}

struct ExecutorInner {
    handle: Handle,
    runtime: Option<Runtime>,
}

impl Drop for ExecutorInner {
    fn drop(&mut self) {
        // An owned runtime may be released from inside async code.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

static SHARED: OnceLock<Executor> = OnceLock::new();

impl Executor {
    /// Takes ownership of a runtime; it shuts down when the last clone is dropped.
    pub fn from_runtime(runtime: Runtime) -> Self {
        Executor {
            inner: Arc::new(ExecutorInner {
                handle: runtime.handle().clone(),
                runtime: Some(runtime),
            }),
        }
    }

    /// Borrows a runtime owned elsewhere.
    pub fn from_handle(handle: Handle) -> Self {
        Executor {
            inner: Arc::new(ExecutorInner {
                handle,
                runtime: None,
            }),
        }
    }

    /// The process-wide multi-thread pool, built on first use and kept until process exit.
    pub fn shared() -> Result<Executor> {
        if let Some(executor) = SHARED.get() {
            return Ok(executor.clone());
        }
        let runtime = Builder::new_multi_thread()
            .thread_name("lime-worker")
            .enable_all()
            .build()
            .map_err(|e| {
                ExplainError::internal(format!("failed to start shared executor: {}", e))
            })?;
        debug!("shared executor started");
        // A racing initialiser may win; its runtime is kept and ours is dropped.
        let _ = SHARED.set(Executor::from_runtime(runtime));
        SHARED
            .get()
            .cloned()
            .ok_or_else(|| ExplainError::internal("shared executor unavailable"))
    }

    /// The runtime the caller is running on, else the shared pool.
    pub fn current_or_shared() -> Result<Executor> {
        match Handle::try_current() {
            Ok(handle) => Ok(Executor::from_handle(handle)),
            Err(_) => Executor::shared(),
        }
    }

    pub fn handle(&self) -> &Handle {
        &self.inner.handle
    }

    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.inner.handle.spawn(future)
    }

    /// True when both values refer to the same executor instance.
    pub fn same_as(&self, other: &Executor) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("owns_runtime", &self.inner.runtime.is_some())
            .finish()
    }
}

/// Pending result of an asynchronous explanation.
///
/// Dropping the handle detaches the task; [`ExplanationHandle::cancel`] aborts it.
/// Each task owns its samples and fit state, so aborting has no effect on anything
/// shared.
#[derive(Debug)]
pub struct ExplanationHandle<T> {
    task: JoinHandle<Result<T>>,
}

impl<T: Send + 'static> ExplanationHandle<T> {
    pub fn spawn<F>(executor: &Executor, future: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        ExplanationHandle {
            task: executor.spawn(future),
        }
    }

    /// Waits at most `timeout` for the result. On expiry the task is aborted and
    /// `ExplainError::Timeout` is returned.
    pub async fn wait(self, timeout: Duration) -> Result<T> {
        let abort = self.task.abort_handle();
        match tokio::time::timeout(timeout, self.task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) if join_error.is_cancelled() => Err(ExplainError::Cancelled),
            Ok(Err(join_error)) => Err(ExplainError::internal(format!(
                "explanation task failed: {}",
                join_error
            ))),
            Err(_) => {
                abort.abort();
                Err(ExplainError::Timeout(format!(
                    "explanation did not complete within {:?}",
                    timeout
                )))
            }
        }
    }

    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
