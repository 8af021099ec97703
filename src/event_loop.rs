// src/event_loop.rs

//! The operation execution loop.
//!
//! A `Loop` owns exactly one worker thread. The worker pulls operations from
//! a shared `MessageQueue`, applies them to the single drawing surface it
//! owns, and hands the surface to the `Receiver` whenever an operation
//! reports readiness. Producers (script batches, direct callers, operations
//! posting from inside `apply`) only enqueue; nothing but the worker ever
//! touches the surface, so surface mutation needs no lock.
//!
//! ## Lifecycle
//! ```text
//! NotStarted ──start()──► Running ──stop_and_wait()──► StopRequested ──(queue drained)──► Stopped
//! ```
//! Stop is drain-then-exit: everything queued before the stop request runs.
//! Operations posted after `stop_and_wait` has been called may or may not run.

mod queue;

pub use queue::MessageQueue;

use crate::ops::{BoxedOperation, Canvas, FigureTable};
use crate::surface::{Size, Surface, SurfaceProvider};
use anyhow::{bail, Context, Result};
use log::*;
use once_cell::sync::OnceCell;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};

/// Surface size used unless [`Loop::with_surface_size`] says otherwise.
pub const DEFAULT_SURFACE_SIZE: Size = Size::new(800, 800);

/// Consumer of presentable surfaces.
///
/// Called on the worker thread. The surface is only valid for the duration
/// of the call and must be treated as read-only; copy what you need.
pub trait Receiver: Send + Sync {
    fn on_ready(&self, surface: &dyn Surface);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    NotStarted,
    Running,
    StopRequested,
    Stopped,
}

/// Queue entries. `Wake` unblocks a worker parked in `pull` so it re-checks
/// the stop condition; it is never applied to the surface.
enum Task {
    Run(BoxedOperation),
    Wake,
}

struct Shared {
    state: Mutex<LoopState>,
    changed: Condvar,
    /// Set by the worker before it applies anything.
    worker_thread: OnceCell<ThreadId>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, LoopState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn stop_requested(&self) -> bool {
        *self.lock() == LoopState::StopRequested
    }

    fn on_worker_thread(&self) -> bool {
        self.worker_thread.get() == Some(&thread::current().id())
    }
}

/// Marks the loop `Stopped` when the worker exits, including by panic.
struct CompletionGuard(Arc<Shared>);

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        *self.0.lock() = LoopState::Stopped;
        self.0.changed.notify_all();
    }
}

/// Cloneable posting endpoint. Safe to use from any thread, including from
/// inside a running operation.
#[derive(Clone)]
pub struct LoopHandle {
    queue: Arc<MessageQueue<Task>>,
}

impl LoopHandle {
    /// Enqueues `op` at the tail. Never blocks.
    pub fn post(&self, op: BoxedOperation) {
        self.queue.push(Task::Run(op));
    }

    /// Posts each operation of a batch individually, in order.
    pub fn post_all<I>(&self, ops: I)
    where
        I: IntoIterator<Item = BoxedOperation>,
    {
        for op in ops {
            self.post(op);
        }
    }
}

pub struct Loop {
    receiver: Arc<dyn Receiver>,
    surface_size: Size,
    queue: Arc<MessageQueue<Task>>,
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Loop {
    pub fn new(receiver: Arc<dyn Receiver>) -> Self {
        Self {
            receiver,
            surface_size: DEFAULT_SURFACE_SIZE,
            queue: Arc::new(MessageQueue::new()),
            shared: Arc::new(Shared {
                state: Mutex::new(LoopState::NotStarted),
                changed: Condvar::new(),
                worker_thread: OnceCell::new(),
            }),
            worker: Mutex::new(None),
        }
    }

    /// Size of the surface requested from the provider at `start`.
    pub fn with_surface_size(mut self, size: Size) -> Self {
        self.surface_size = size;
        self
    }

    /// Acquires the drawing surface and spawns the worker.
    ///
    /// # Errors
    /// Fails if the loop was already started, if the provider cannot supply a
    /// surface, or if the thread cannot be spawned. The loop stays
    /// `NotStarted` in every failure case.
    pub fn start(&self, provider: &dyn SurfaceProvider) -> Result<()> {
        let mut state = self.shared.lock();
        if *state != LoopState::NotStarted {
            bail!("Loop cannot be started from state {:?}", *state);
        }

        let surface = provider
            .new_surface(self.surface_size)
            .context("Failed to acquire drawing surface")?;

        let worker = Worker {
            queue: self.queue.clone(),
            receiver: self.receiver.clone(),
            shared: self.shared.clone(),
            surface,
            figures: FigureTable::new(),
        };
        let handle = thread::Builder::new()
            .name("painter-loop".to_string())
            .spawn(move || worker.run())
            .context("Failed to spawn loop worker thread")?;

        *state = LoopState::Running;
        drop(state);
        *self.worker_slot() = Some(handle);

        info!(
            "Loop: Started with {}x{} surface",
            self.surface_size.width, self.surface_size.height
        );
        Ok(())
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            queue: self.queue.clone(),
        }
    }

    /// Enqueues `op`. Operations posted before `start` wait in the queue.
    pub fn post(&self, op: BoxedOperation) {
        self.queue.push(Task::Run(op));
    }

    pub fn post_all<I>(&self, ops: I)
    where
        I: IntoIterator<Item = BoxedOperation>,
    {
        self.handle().post_all(ops);
    }

    /// Requests shutdown and blocks until the worker has drained the queue
    /// and exited. Safe to call repeatedly and from several threads.
    ///
    /// Called from inside an operation, it only requests the stop and returns
    /// at once: the worker cannot wait for itself.
    pub fn stop_and_wait(&self) {
        let needs_wake = {
            let mut state = self.shared.lock();
            match *state {
                LoopState::NotStarted => {
                    info!("Loop: Stopped before it was started");
                    *state = LoopState::Stopped;
                    self.shared.changed.notify_all();
                    return;
                }
                LoopState::Running => {
                    debug!("Loop: Stop requested");
                    *state = LoopState::StopRequested;
                    true
                }
                LoopState::StopRequested | LoopState::Stopped => false,
            }
        };
        if needs_wake {
            self.queue.push(Task::Wake);
        }
        if self.shared.on_worker_thread() {
            warn!("Loop: stop_and_wait called from the worker thread, not waiting");
            return;
        }

        let mut state = self.shared.lock();
        while *state != LoopState::Stopped {
            state = self
                .shared
                .changed
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        drop(state);

        let handle = self.worker_slot().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("Loop: Worker thread panicked while applying an operation");
            }
        }
    }

    pub fn state(&self) -> LoopState {
        *self.shared.lock()
    }

    /// True once the worker has fully exited (or the loop was stopped unstarted).
    pub fn is_stopped(&self) -> bool {
        self.state() == LoopState::Stopped
    }

    fn worker_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Loop {
    fn drop(&mut self) {
        if matches!(self.state(), LoopState::Running | LoopState::StopRequested) {
            debug!("Loop: Dropped while running, stopping worker");
            self.stop_and_wait();
        }
    }
}

/// State owned by the worker thread.
struct Worker {
    queue: Arc<MessageQueue<Task>>,
    receiver: Arc<dyn Receiver>,
    shared: Arc<Shared>,
    surface: Box<dyn Surface>,
    figures: FigureTable,
}

impl Worker {
    fn run(mut self) {
        let _completion = CompletionGuard(self.shared.clone());
        let _ = self.shared.worker_thread.set(thread::current().id());
        info!("Loop: Worker started");

        let mut applied = 0usize;
        let mut presented = 0usize;
        loop {
            if self.shared.stop_requested() && self.queue.is_empty() {
                break;
            }
            match self.queue.pull() {
                Task::Run(mut op) => {
                    trace!("Loop: Applying {:?} operation", op.kind());
                    let ready = {
                        let mut canvas = Canvas::new(self.surface.as_mut(), &mut self.figures);
                        op.apply(&mut canvas)
                    };
                    applied += 1;
                    if ready {
                        presented += 1;
                        debug!("Loop: Surface ready, notifying receiver");
                        self.receiver.on_ready(self.surface.as_ref());
                    }
                }
                Task::Wake => trace!("Loop: Woken to re-check stop condition"),
            }
        }

        info!(
            "Loop: Worker stopped after {} operations ({} presented, {} figures displaced)",
            applied,
            presented,
            self.figures.len()
        );
    }
}

#[cfg(test)]
mod tests;
