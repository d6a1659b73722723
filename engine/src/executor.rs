//! Execution-context abstraction and the serial background executor.
//!
//! All compositor-boundary calls are funneled through a [`TaskExecutor`] so
//! they can be strictly ordered regardless of which thread triggered them.
//! Production wiring uses [`SerialExecutor`]; tests substitute an inline
//! executor to make dispatch synchronous.

use std::thread::{self, JoinHandle};

use tokio::sync::mpsc;

/// A unit of work handed to an executor.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// An execution context that runs tasks without blocking the caller.
pub trait TaskExecutor: Send + Sync {
    fn execute(&self, task: Task);
}

/// Runs tasks on one dedicated background thread, in submission order.
///
/// A single consumer draining an unbounded channel gives FIFO execution with
/// no re-entrancy; callers never block. Dropping the executor closes the
/// channel, lets the worker drain what was already queued, and joins it.
pub struct SerialExecutor {
    sender: Option<mpsc::UnboundedSender<Task>>,
    worker: Option<JoinHandle<()>>,
}

impl SerialExecutor {
    pub fn new(thread_name: &str) -> std::io::Result<Self> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Task>();
        let worker = thread::Builder::new()
            .name(thread_name.to_string())
            .spawn(move || {
                while let Some(task) = receiver.blocking_recv() {
                    task();
                }
                tracing::debug!("serial executor channel closed, worker exiting");
            })?;
        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }
}

impl TaskExecutor for SerialExecutor {
    fn execute(&self, task: Task) {
        let Some(sender) = &self.sender else {
            return;
        };
        if sender.send(task).is_err() {
            tracing::warn!("serial executor worker is gone, dropping task");
        }
    }
}

impl Drop for SerialExecutor {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("serial executor worker panicked");
            }
        }
    }
}

impl std::fmt::Debug for SerialExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialExecutor").finish_non_exhaustive()
    }
}
