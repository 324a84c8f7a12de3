//! Background work that outlives the response it was started for.
//!
//! A stale-while-revalidate refresh may still be writing to the cache after
//! the page already has its response. Those tasks are registered here so a
//! host can extend the worker's lifetime until they finish, or drop them.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Tracker for detached background tasks.
#[derive(Clone, Default)]
pub struct BackgroundTasks {
    handles: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl BackgroundTasks {
    /// Spawn `task` on the runtime and track it until it completes.
    pub async fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        let mut handles = self.handles.lock().await;
        handles.retain(|h| !h.is_finished());
        handles.push(handle);
    }

    /// Number of tracked tasks that have not finished yet.
    pub async fn pending(&self) -> usize {
        let handles = self.handles.lock().await;
        handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// Wait until every tracked task, including ones spawned while waiting,
    /// has finished.
    pub async fn settle(&self) {
        loop {
            let drained: Vec<JoinHandle<()>> = {
                let mut handles = self.handles.lock().await;
                handles.drain(..).collect()
            };
            if drained.is_empty() {
                return;
            }
            for handle in drained {
                if let Err(e) = handle.await {
                    tracing::warn!("background task failed: {e}");
                }
            }
        }
    }

    /// Abort every tracked task. Used when the host tears the worker down.
    pub async fn abort_all(&self) {
        let mut handles = self.handles.lock().await;
        for handle in handles.drain(..) {
            handle.abort();
        }
    }
}
