//! Running file I/O off the UI thread.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use fltk::app::Sender;

use super::error::{AppError, Result};
use crate::app::domain::messages::{IoOutcome, Message};

type Work = Box<dyn FnOnce() -> IoOutcome + Send + 'static>;
type Abandoned = Box<dyn FnOnce(AppError) -> IoOutcome + Send + 'static>;

/// A unit of file I/O. Always produces an outcome: if the work panics,
/// `abandoned` turns the panic into a failed outcome for the same request.
pub struct IoTask {
    work: Work,
    abandoned: Abandoned,
}

impl IoTask {
    pub fn new(
        work: impl FnOnce() -> IoOutcome + Send + 'static,
        abandoned: impl FnOnce(AppError) -> IoOutcome + Send + 'static,
    ) -> Self {
        Self {
            work: Box::new(work),
            abandoned: Box::new(abandoned),
        }
    }

    pub fn run(self) -> IoOutcome {
        let Self { work, abandoned } = self;
        match panic::catch_unwind(AssertUnwindSafe(work)) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                tracing::error!("I/O task panicked: {}", message);
                abandoned(AppError::Io(io::Error::other(format!("I/O task failed: {}", message))))
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs I/O tasks and delivers each outcome back to the UI thread.
///
/// `Err` means the task was not started and no outcome will arrive.
pub trait IoRunner {
    fn run(&self, task: IoTask) -> Result<()>;
}

/// One worker thread per task; the outcome comes back as
/// [`Message::Io`] through the FLTK channel.
pub struct ThreadIoRunner {
    sender: Sender<Message>,
}

impl ThreadIoRunner {
    pub fn new(sender: Sender<Message>) -> Self {
        Self { sender }
    }
}

impl IoRunner for ThreadIoRunner {
    fn run(&self, task: IoTask) -> Result<()> {
        let sender = self.sender;
        thread::Builder::new()
            .name("webpad-io".to_string())
            .spawn(move || {
                let outcome = task.run();
                sender.send(Message::Io(outcome));
                fltk::app::awake();
            })
            .map_err(|e| {
                tracing::error!("could not start I/O thread: {}", e);
                AppError::Io(e)
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn load_task(work: impl FnOnce() -> IoOutcome + Send + 'static) -> IoTask {
        let path = PathBuf::from("a.txt");
        IoTask::new(work, move |e| IoOutcome::Loaded { path, result: Err(e) })
    }

    #[test]
    fn test_task_returns_work_outcome() {
        let outcome = load_task(|| IoOutcome::Loaded {
            path: PathBuf::from("a.txt"),
            result: Err(AppError::Io(io::Error::other("nope"))),
        })
        .run();
        assert!(matches!(outcome, IoOutcome::Loaded { result: Err(AppError::Io(_)), .. }));
    }

    #[test]
    fn test_panicking_task_still_yields_outcome() {
        let outcome = load_task(|| panic!("disk on fire")).run();
        match outcome {
            IoOutcome::Loaded { path, result: Err(e) } => {
                assert_eq!(path, PathBuf::from("a.txt"));
                assert!(e.to_string().contains("disk on fire"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
