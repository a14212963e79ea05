//! Crossing into the UI thread.
//!
//! Every piece of state that talks to the embedded runtime is confined to
//! the UI thread. Other threads reach it only through a [`UiQueue`].

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};

use crossbeam_channel::{Receiver, Sender};

use super::error::{AppError, Result};

pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

pub trait UiQueue: Send + Sync {
    /// Whether the calling thread is the UI thread.
    fn is_ui_thread(&self) -> bool;

    /// Enqueue `task` for the next UI turn. Never runs it inline.
    fn submit(&self, task: UiTask);
}

/// Run `task` on the UI thread and wait for its result.
///
/// Runs inline when already on the UI thread, so the UI thread never
/// waits on itself.
pub fn submit_and_wait<T, F>(queue: &dyn UiQueue, task: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    if queue.is_ui_thread() {
        return Ok(task());
    }

    let (tx, rx) = crossbeam_channel::bounded(1);
    queue.submit(Box::new(move || {
        // the waiting side may have given up; nothing to report then
        let _ = tx.send(task());
    }));
    rx.recv()
        .map_err(|_| AppError::Disconnected("UI thread dropped the task".to_string()))
}

/// Queue backed by the FLTK event loop.
///
/// Tasks are handed to `fltk::app::awake_callback`, which runs them on the
/// thread that owns the loop.
pub struct FltkUiQueue {
    ui_thread: ThreadId,
}

impl FltkUiQueue {
    /// Must be created on the thread that runs the FLTK loop.
    pub fn new() -> Self {
        Self {
            ui_thread: thread::current().id(),
        }
    }
}

impl Default for FltkUiQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl UiQueue for FltkUiQueue {
    fn is_ui_thread(&self) -> bool {
        thread::current().id() == self.ui_thread
    }

    fn submit(&self, task: UiTask) {
        // awake_callback wants FnMut; the task runs exactly once
        let slot = Mutex::new(Some(task));
        fltk::app::awake_callback(move || {
            let task = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
            if let Some(task) = task {
                task();
            }
        });
    }
}

/// Queue with an explicit UI thread: whichever thread calls
/// [`ChannelUiQueue::run_pending`] or [`ChannelUiQueue::run_until_closed`].
///
/// Used for headless runs and tests.
#[derive(Clone)]
pub struct ChannelUiQueue {
    tx: Sender<UiTask>,
    rx: Receiver<UiTask>,
    ui_thread: Arc<Mutex<Option<ThreadId>>>,
}

impl ChannelUiQueue {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            tx,
            rx,
            ui_thread: Arc::new(Mutex::new(None)),
        }
    }

    /// Claim the calling thread as the UI thread.
    pub fn claim_current_thread(&self) {
        *self.ui_thread.lock().unwrap_or_else(PoisonError::into_inner) = Some(thread::current().id());
    }

    /// Run every task queued so far, plus those they enqueue. Returns the
    /// number of tasks run.
    pub fn run_pending(&self) -> usize {
        self.claim_current_thread();
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Serve tasks until every sender clone has been dropped.
    pub fn run_until_closed(self) {
        self.claim_current_thread();
        let rx = self.rx.clone();
        drop(self);
        for task in rx.iter() {
            task();
        }
    }
}

impl Default for ChannelUiQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl UiQueue for ChannelUiQueue {
    fn is_ui_thread(&self) -> bool {
        *self.ui_thread.lock().unwrap_or_else(PoisonError::into_inner) == Some(thread::current().id())
    }

    fn submit(&self, task: UiTask) {
        let _ = self.tx.send(task);
    }
}
