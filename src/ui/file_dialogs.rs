use std::path::{Path, PathBuf};

use fltk::dialog::{NativeFileChooser, NativeFileChooserOptions, NativeFileChooserType};

fn run_chooser(
    title: &str,
    save: bool,
    filter: &str,
    start_dir: Option<&Path>,
) -> Option<PathBuf> {
    let mut chooser = NativeFileChooser::new(if save {
        NativeFileChooserType::BrowseSaveFile
    } else {
        NativeFileChooserType::BrowseFile
    });
    chooser.set_title(title);
    chooser.set_filter(filter);
    if save {
        chooser.set_option(NativeFileChooserOptions::SaveAsConfirm);
    }
    if let Some(dir) = start_dir {
        if let Err(e) = chooser.set_directory(&dir) {
            tracing::debug!("cannot start chooser in {}: {:?}", dir.display(), e);
        }
    }
    chooser.show();

    let path = chooser.filename();
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

/// `filter` uses the FLTK native chooser format, one `Description\tPattern`
/// per line.
pub fn native_open_dialog(filter: &str, start_dir: Option<&Path>) -> Option<PathBuf> {
    run_chooser("Open File", false, filter, start_dir)
}

pub fn native_save_dialog(filter: &str, start_dir: Option<&Path>) -> Option<PathBuf> {
    run_chooser("Save As", true, filter, start_dir)
}
