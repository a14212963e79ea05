use std::path::PathBuf;

use encoding_rs::Encoding;

use super::document::Location;
use crate::app::infrastructure::error::Result;
use crate::app::services::document_io::LoadedText;

/// Completion of file I/O run on a worker thread.
#[derive(Debug)]
pub enum IoOutcome {
    Loaded {
        path: PathBuf,
        result: Result<LoadedText>,
    },
    Saved {
        location: Location,
        result: Result<&'static Encoding>,
    },
}

/// All messages that can be sent through the FLTK channel.
/// Menu callbacks, the webview host and worker threads send these; the
/// dispatch loop in `AppState::run` handles them.
#[derive(Debug)]
pub enum Message {
    // File
    FileNew,
    FileOpen,
    FileSave,
    FileSaveAs,
    FileQuit,
    WindowClose,

    // Edit
    EditUndo,
    EditRedo,
    EditCut,
    EditCopy,
    EditPaste,
    ShowFind,

    // View
    TogglePreview,

    // Settings & Help
    OpenSettings,
    ShowAbout,

    // Editor pane
    PageLoaded,
    EditorEvents,

    // Background file I/O
    Io(IoOutcome),
}
