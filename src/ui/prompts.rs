//! FLTK implementation of the controller's dialogs.

use std::path::{Path, PathBuf};

use fltk::dialog;

use super::file_dialogs::{native_open_dialog, native_save_dialog};
use crate::app::controllers::{CloseChoice, UserPrompt};

pub struct FltkPrompt;

impl UserPrompt for FltkPrompt {
    fn confirm_unsaved(&self, name: &str) -> CloseChoice {
        let choice = dialog::choice2_default(
            &format!("\"{}\" has unsaved changes.", name),
            "Save",
            "Discard",
            "Cancel",
        );
        match choice {
            Some(0) => CloseChoice::Save,
            Some(1) => CloseChoice::Discard,
            _ => CloseChoice::Cancel,
        }
    }

    fn show_error(&self, message: &str) {
        dialog::alert_default(message);
    }

    fn choose_open_file(&self, filter: &str, start_dir: Option<&Path>) -> Option<PathBuf> {
        native_open_dialog(filter, start_dir)
    }

    fn choose_save_file(&self, filter: &str, start_dir: Option<&Path>) -> Option<PathBuf> {
        native_save_dialog(filter, start_dir)
    }
}
