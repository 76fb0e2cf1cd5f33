// mob-rs: `ModOrganizer` Build Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use flume::{Receiver, Sender};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, trace};

use super::SubmoduleRequest;
use crate::core::process::ProcessRunner;
use crate::error::MobResult;

const WORKER_NAME: &str = "submodule_adder";

enum Message {
    Add(SubmoduleRequest),
    /// Wakes the worker so it notices the quit flag.
    Wake,
    /// Process everything sent before, then exit.
    Finish,
}

/// Observable state of the worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Blocked waiting for requests.
    Idle,
    /// Running a batch.
    Draining,
    /// Exited; nothing enqueued from now on runs.
    Stopped,
}

impl WorkerState {
    const fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Draining => 1,
            Self::Stopped => 2,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Draining,
            _ => Self::Stopped,
        }
    }
}

#[derive(Debug)]
struct Shared {
    quit: AtomicBool,
    state: AtomicU8,
}

impl Shared {
    fn set_state(&self, state: WorkerState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    fn quitting(&self) -> bool {
        self.quit.load(Ordering::Acquire)
    }
}

/// Cheap, cloneable producer side of a [`SubmoduleQueue`].
#[derive(Debug, Clone)]
pub struct SubmoduleQueueHandle {
    tx: Sender<Message>,
    shared: Arc<Shared>,
}

impl SubmoduleQueueHandle {
    /// Queues `request` and returns immediately.
    ///
    /// Requests enqueued after [`SubmoduleQueue::stop`], or after the worker
    /// exited, are dropped.
    pub fn enqueue(&self, request: SubmoduleRequest) {
        if self.shared.quitting() {
            debug!(submodule = request.name(), "submodule queue stopped, dropping request");
            return;
        }

        trace!(submodule = request.name(), root = %request.root().display(), "queueing submodule");
        if let Err(flume::SendError(Message::Add(request))) = self.tx.send(Message::Add(request)) {
            debug!(submodule = request.name(), "submodule worker gone, dropping request");
        }
    }

    /// Current worker state.
    #[must_use]
    pub fn state(&self) -> WorkerState {
        WorkerState::from_u8(self.shared.state.load(Ordering::Acquire))
    }
}

/// Owner of the single background thread that adds submodules.
///
/// Requests run one at a time in the order they were accepted. Dropping the
/// queue stops it and waits for the worker to exit; use
/// [`finish`](Self::finish) to let queued requests complete first.
#[derive(Debug)]
pub struct SubmoduleQueue {
    handle: SubmoduleQueueHandle,
    worker: Option<JoinHandle<()>>,
}

impl SubmoduleQueue {
    /// Spawns the worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn start(runner: Arc<dyn ProcessRunner>) -> MobResult<Self> {
        let (tx, rx) = flume::unbounded();
        let shared = Arc::new(Shared {
            quit: AtomicBool::new(false),
            state: AtomicU8::new(WorkerState::Idle.as_u8()),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || {
                run_worker(&rx, &worker_shared, runner.as_ref());
                worker_shared.set_state(WorkerState::Stopped);
                trace!("submodule worker exited");
            })?;

        Ok(Self {
            handle: SubmoduleQueueHandle { tx, shared },
            worker: Some(worker),
        })
    }

    /// A producer handle for other threads or tasks.
    #[must_use]
    pub fn handle(&self) -> SubmoduleQueueHandle {
        self.handle.clone()
    }

    /// Queues `request` and returns immediately.
    pub fn enqueue(&self, request: SubmoduleRequest) {
        self.handle.enqueue(request);
    }

    /// Asks the worker to exit after the request it is running, abandoning
    /// everything still queued. Does not wait.
    pub fn stop(&self) {
        self.handle.shared.quit.store(true, Ordering::Release);
        let _ = self.handle.tx.send(Message::Wake);
    }

    /// Current worker state.
    #[must_use]
    pub fn state(&self) -> WorkerState {
        self.handle.state()
    }

    /// Waits for every request enqueued so far to run, then joins the worker.
    pub fn finish(mut self) {
        let _ = self.handle.tx.send(Message::Finish);
        self.join();
    }

    fn join(&mut self) {
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            error!("submodule worker panicked");
        }
    }
}

impl Drop for SubmoduleQueue {
    fn drop(&mut self) {
        self.stop();
        self.join();
    }
}

fn run_worker(rx: &Receiver<Message>, shared: &Shared, runner: &dyn ProcessRunner) {
    loop {
        shared.set_state(WorkerState::Idle);

        // only fails once every sender is gone
        let Ok(first) = rx.recv() else {
            return;
        };

        if shared.quitting() {
            return;
        }

        shared.set_state(WorkerState::Draining);

        // snapshot; anything sent while the batch runs waits for the next cycle
        let batch: Vec<Message> = std::iter::once(first).chain(rx.try_iter()).collect();
        trace!(count = batch.len(), "submodule worker woke up");

        let mut finishing = false;
        for message in batch {
            match message {
                Message::Add(request) if !finishing => {
                    if shared.quitting() {
                        debug!("submodule worker stopping, abandoning queued requests");
                        return;
                    }

                    if let Err(e) = request.run(runner) {
                        error!(submodule = request.name(), "{e}");
                        return;
                    }
                }
                Message::Add(request) => {
                    debug!(submodule = request.name(), "sent after finish, dropping request");
                }
                Message::Wake => {}
                Message::Finish => finishing = true,
            }
        }

        if finishing {
            return;
        }
    }
}
