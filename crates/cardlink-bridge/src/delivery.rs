// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Delivery contexts: where host-facing callbacks are allowed to run.
//
// The SDK reports results from whatever thread it likes. Host runtimes want
// events on one designated context (the UI thread on iOS, the module queue
// elsewhere). A `DeliveryContext` is that context.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::mpsc;
use std::thread::{self, JoinHandle, ThreadId};

use tracing::{debug, error, warn};

use cardlink_core::error::Result;

/// Unit of work marshaled onto a delivery context.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// An execution context tasks can be posted to.
pub trait DeliveryContext: Send + Sync {
    /// Queue `task` to run on this context. Must not block on the task.
    fn dispatch(&self, task: Task);

    /// Label used in logs.
    fn label(&self) -> &str;
}

/// Runs every task inline on the calling thread.
///
/// Only correct when the SDK already notifies on the host's context.
#[derive(Debug, Default, Clone, Copy)]
pub struct Immediate;

impl DeliveryContext for Immediate {
    fn dispatch(&self, task: Task) {
        run_guarded(task, self.label());
    }

    fn label(&self) -> &str {
        "immediate"
    }
}

/// A dedicated named thread draining a FIFO queue.
///
/// Tasks run one at a time in submission order. Dropping the queue lets the
/// worker finish what was already queued and then joins it.
pub struct SerialQueue {
    name: String,
    sender: Option<mpsc::Sender<Task>>,
    worker: Option<JoinHandle<()>>,
    worker_id: ThreadId,
}

impl SerialQueue {
    /// Spawn the worker thread.
    pub fn spawn(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let (sender, receiver) = mpsc::channel::<Task>();
        let label = name.clone();
        let worker = thread::Builder::new().name(name.clone()).spawn(move || {
            for task in receiver {
                run_guarded(task, &label);
            }
            debug!(queue = %label, "delivery queue drained");
        })?;
        let worker_id = worker.thread().id();
        debug!(queue = %name, "delivery queue started");
        Ok(Self {
            name,
            sender: Some(sender),
            worker: Some(worker),
            worker_id,
        })
    }

    /// Whether the caller is running on this queue's worker thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.worker_id
    }

    /// Block until every task queued before this call has run.
    ///
    /// Returns immediately when called from the worker itself.
    pub fn flush(&self) {
        if self.is_current() {
            return;
        }
        let (done_tx, done_rx) = mpsc::channel();
        self.dispatch(Box::new(move || {
            let _ = done_tx.send(());
        }));
        // An Err here means the worker is gone, so there is nothing to wait for.
        let _ = done_rx.recv();
    }
}

impl DeliveryContext for SerialQueue {
    fn dispatch(&self, task: Task) {
        let Some(sender) = &self.sender else {
            return;
        };
        if sender.send(task).is_err() {
            warn!(queue = %self.name, "delivery queue worker has exited; task dropped");
        }
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Drop for SerialQueue {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if self.is_current() {
                return;
            }
            if worker.join().is_err() {
                error!(queue = %self.name, "delivery queue worker panicked");
            }
        }
    }
}

impl std::fmt::Debug for SerialQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialQueue")
            .field("name", &self.name)
            .field("running", &self.sender.is_some())
            .finish()
    }
}

/// Run a task, containing any panic so it cannot unwind into the host or
/// kill a delivery worker.
pub(crate) fn run_guarded(task: Task, context: &str) {
    if catch_unwind(AssertUnwindSafe(task)).is_err() {
        error!(context, "delivery task panicked; continuing");
    }
}
