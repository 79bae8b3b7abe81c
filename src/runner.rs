//! Owned tokio runtime for driving async work from synchronous callers

use std::future::Future;
use std::sync::mpsc;

use tokio::runtime::{Builder, Runtime};

use crate::error::{Result, WardrobeError};

/// Runs futures to completion on a runtime it owns.
///
/// `run` spawns the future onto the owned runtime and waits on a channel, so it
/// works from plain threads and from inside some other tokio runtime alike.
/// It must not be called from a task already running on this runner.
pub struct TaskRunner {
    runtime: Option<Runtime>,
}

impl TaskRunner {
    pub fn new(worker_threads: usize) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads.max(1))
            .thread_name("wardrobe-runner")
            .enable_all()
            .build()
            .map_err(|e| WardrobeError::Internal {
                message: format!("Failed to create runtime: {}", e),
            })?;
        Ok(Self {
            runtime: Some(runtime),
        })
    }

    fn runtime(&self) -> &Runtime {
        // Only taken in Drop
        self.runtime
            .as_ref()
            .unwrap_or_else(|| unreachable!("runtime taken before drop"))
    }

    /// Drive `fut` to completion, blocking the calling thread
    pub fn run<F>(&self, fut: F) -> Result<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let runtime = self.runtime();
        let task = runtime.spawn(fut);
        runtime.spawn(async move {
            let _ = tx.send(task.await);
        });

        match rx.recv() {
            Ok(outcome) => Ok(outcome?),
            Err(_) => Err(WardrobeError::Internal {
                message: "runner shut down before the task completed".to_string(),
            }),
        }
    }
}

impl Drop for TaskRunner {
    fn drop(&mut self) {
        // A plain drop blocks, which panics inside an async context
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn runs_from_plain_thread() {
        let runner = TaskRunner::new(1).unwrap();
        let out = runner
            .run(async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                21 * 2
            })
            .unwrap();
        assert_eq!(out, 42);
    }

    #[tokio::test]
    async fn runs_inside_another_runtime() {
        let runner = TaskRunner::new(1).unwrap();
        let out = runner.run(async { "nested".to_string() }).unwrap();
        assert_eq!(out, "nested");
        drop(runner);
    }

    #[test]
    fn panicking_task_is_internal_error() {
        let runner = TaskRunner::new(1).unwrap();
        let err = runner
            .run(async {
                panic!("boom");
            })
            .unwrap_err();
        assert!(matches!(err, WardrobeError::Internal { .. }));
    }
}
