use std::sync::{Mutex, PoisonError};

use super::error::{AppError, Result};

/// Plain-text clipboard used by the bridge's copy/cut/paste callbacks.
pub trait Clipboard: Send + Sync {
    /// Current plain-text content, or `None` when the clipboard holds no text.
    fn get_text(&self) -> Option<String>;

    fn set_text(&self, text: &str) -> Result<()>;
}

/// The system clipboard via arboard.
///
/// The arboard handle is opened lazily and kept for the life of the
/// process; on Linux dropping it may discard what we put on the clipboard.
#[derive(Default)]
pub struct SystemClipboard {
    handle: Mutex<Option<arboard::Clipboard>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_handle<T>(&self, f: impl FnOnce(&mut arboard::Clipboard) -> Result<T>) -> Result<T> {
        let mut guard = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.is_none() {
            let clipboard = arboard::Clipboard::new().map_err(|e| AppError::Clipboard(e.to_string()))?;
            *guard = Some(clipboard);
        }
        match guard.as_mut() {
            Some(clipboard) => f(clipboard),
            None => Err(AppError::Clipboard("clipboard unavailable".to_string())),
        }
    }
}

impl Clipboard for SystemClipboard {
    fn get_text(&self) -> Option<String> {
        match self.with_handle(|c| c.get_text().map_err(|e| AppError::Clipboard(e.to_string()))) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!("clipboard read failed: {}", e);
                None
            }
        }
    }

    fn set_text(&self, text: &str) -> Result<()> {
        self.with_handle(|c| {
            c.set_text(text.to_string())
                .map_err(|e| AppError::Clipboard(e.to_string()))
        })
    }
}

/// Process-local clipboard. Used when no system clipboard is available
/// and in tests.
#[derive(Default)]
pub struct MemoryClipboard {
    content: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            content: Mutex::new(Some(text.to_string())),
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&self) -> Option<String> {
        self.content.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn set_text(&self, text: &str) -> Result<()> {
        *self.content.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}
