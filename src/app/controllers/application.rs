//! Document lifecycle shared by every editor variant.
//!
//! One controller owns at most one [`Document`]. File I/O runs through an
//! [`IoRunner`]; its outcome comes back through [`ApplicationController::complete_io`]
//! on the UI thread. Widget events arrive on a channel and are applied by
//! [`ApplicationController::process_editor_events`].

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use crossbeam_channel::{Receiver, unbounded};
use encoding_rs::Encoding;

use super::editor::{EditorEvent, EditorWidget};
use super::settings_session::SettingsSession;
use crate::app::domain::document::{Document, Location};
use crate::app::domain::messages::IoOutcome;
use crate::app::domain::property::Property;
use crate::app::domain::settings::EditorSettings;
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::io_runner::{IoRunner, IoTask};
use crate::app::infrastructure::preferences::{Preferences, SettingsStore};
use crate::app::services::document_io::LoadedText;
use crate::app::services::kinds::{DocumentKind, filter_string};

pub const APP_NODE: &str = "app";
pub const KEY_DOCUMENT_URI: &str = "document_uri";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    Unloaded,
    Loading,
    Clean,
    Dirty,
    Closing,
    Closed,
    Cancelled,
}

/// Answer to the unsaved-changes prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseChoice {
    Save,
    Discard,
    Cancel,
}

/// Result of a close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    Cancelled,
    /// Waiting for a save; the close finishes when it succeeds.
    AwaitingSave,
}

/// Blocking questions and notices shown to the user.
pub trait UserPrompt {
    fn confirm_unsaved(&self, name: &str) -> CloseChoice;

    fn show_error(&self, message: &str);

    fn choose_open_file(&self, filter: &str, start_dir: Option<&Path>) -> Option<PathBuf>;

    fn choose_save_file(&self, filter: &str, start_dir: Option<&Path>) -> Option<PathBuf>;
}

/// What to do once an outstanding save succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AfterSave {
    Close,
    NewDocument,
    Open(PathBuf),
}

enum Resolution {
    Proceed,
    Stop,
    Deferred,
}

pub struct ApplicationController<K: DocumentKind> {
    kind: Arc<K>,
    widget: EditorWidget,
    prompt: Box<dyn UserPrompt>,
    io: Box<dyn IoRunner>,
    prefs: Rc<RefCell<Preferences>>,
    events: Receiver<EditorEvent>,

    document: Option<Document>,
    state: DocumentState,
    /// State to return to if a load fails.
    state_before_load: DocumentState,
    dirty: Property<bool>,
    save_in_flight: bool,
    /// Text handed to the save in flight.
    saving_text: Option<String>,
    after_save: Option<AfterSave>,
    initial_file: Option<PathBuf>,
    settings: EditorSettings,
}

impl<K: DocumentKind> ApplicationController<K> {
    /// `notify` is called from whatever thread produced a widget event, so
    /// the UI loop knows to call [`Self::process_editor_events`].
    pub fn new(
        kind: K,
        widget: EditorWidget,
        prompt: Box<dyn UserPrompt>,
        io: Box<dyn IoRunner>,
        prefs: Rc<RefCell<Preferences>>,
        notify: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        let (tx, events) = unbounded();
        widget.subscribe(move |event| {
            if tx.send(event).is_ok() {
                notify();
            }
        });

        let settings = EditorSettings::load(&*prefs.borrow());

        let kind = Arc::new(kind);
        if kind.has_preview() {
            let renderer = Arc::clone(&kind);
            widget
                .bridge()
                .set_preview_renderer(Arc::new(move |text: &str| renderer.render_preview(text)));
        }

        Self {
            kind,
            widget,
            prompt,
            io,
            prefs,
            events,
            document: None,
            state: DocumentState::Unloaded,
            state_before_load: DocumentState::Unloaded,
            dirty: Property::new(false),
            save_in_flight: false,
            saving_text: None,
            after_save: None,
            initial_file: None,
            settings,
        }
    }

    /// File to open as soon as the editor is ready.
    pub fn set_initial_file(&mut self, path: Option<PathBuf>) {
        self.initial_file = path;
    }

    // --- queries ---

    pub fn state(&self) -> DocumentState {
        self.state
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn widget(&self) -> &EditorWidget {
        &self.widget
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Observable dirty state of the current document.
    pub fn dirty_property(&self) -> &Property<bool> {
        &self.dirty
    }

    pub fn is_save_in_flight(&self) -> bool {
        self.save_in_flight
    }

    pub fn is_closed(&self) -> bool {
        self.state == DocumentState::Closed
    }

    /// Documents with unsaved changes: the current one, if dirty.
    pub fn dirty_documents(&self) -> Vec<&Document> {
        self.document.iter().filter(|d| d.is_dirty()).collect()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn preferences(&self) -> &Rc<RefCell<Preferences>> {
        &self.prefs
    }

    /// Window title: document name, dirty marker and application name.
    pub fn title(&self) -> String {
        let app = self.kind.app_name();
        match &self.document {
            Some(doc) => {
                let name = if doc.has_location() { doc.name() } else { "Untitled".to_string() };
                let marker = if doc.is_dirty() { "*" } else { "" };
                let read_only = if doc.is_read_only() { " [read-only]" } else { "" };
                format!("{}{}{} - {}", marker, name, read_only, app)
            }
            None => app.to_string(),
        }
    }

    // --- widget events ---

    /// Apply every widget event received so far.
    pub fn process_editor_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                EditorEvent::Ready => self.on_editor_ready(),
                EditorEvent::DirtyChanged(dirty) => self.on_dirty_changed(dirty),
            }
        }
    }

    fn on_editor_ready(&mut self) {
        if self.state != DocumentState::Unloaded || self.document.is_some() {
            return;
        }
        tracing::info!("editor ready");

        if let Err(e) = self.widget.apply(&self.settings) {
            tracing::warn!("could not apply editor settings: {}", e);
        }
        if let Err(e) = self.widget.set_preview_visible(self.kind.has_preview()) {
            tracing::warn!("could not set up preview: {}", e);
        }
        self.new_document();

        if let Some(path) = self.initial_file.take() {
            if let Err(e) = self.begin_load(path) {
                self.report(&e);
            }
        }
    }

    fn on_dirty_changed(&mut self, dirty: bool) {
        if !matches!(self.state, DocumentState::Clean | DocumentState::Dirty) {
            tracing::trace!("dirty = {} ignored in state {:?}", dirty, self.state);
            return;
        }
        let Some(doc) = self.document.as_mut() else {
            return;
        };
        doc.set_dirty(dirty);
        self.state = if dirty { DocumentState::Dirty } else { DocumentState::Clean };
        self.dirty.set(dirty);
    }

    // --- user requests ---

    /// Replace the current document with an empty one.
    pub fn request_new(&mut self) -> Result<()> {
        match self.resolve_unsaved(AfterSave::NewDocument)? {
            Resolution::Proceed => {
                self.new_document();
                Ok(())
            }
            Resolution::Stop | Resolution::Deferred => Ok(()),
        }
    }

    /// Open `path`, or ask the user for a file when `None`.
    pub fn request_open(&mut self, path: Option<PathBuf>) -> Result<()> {
        self.ensure_no_save("open")?;
        let path = match path {
            Some(path) => path,
            None => {
                let filter = filter_string(self.kind.file_filters());
                let start = self.last_directory();
                match self.prompt.choose_open_file(&filter, start.as_deref()) {
                    Some(path) => path,
                    None => return Ok(()),
                }
            }
        };

        match self.resolve_unsaved(AfterSave::Open(path.clone()))? {
            Resolution::Proceed => self.begin_load(path),
            Resolution::Stop | Resolution::Deferred => Ok(()),
        }
    }

    /// Save to the current location; unsaved documents go through
    /// [`Self::save_as`]. Returns whether a save was started.
    pub fn save(&mut self) -> Result<bool> {
        self.ensure_no_save("save")?;
        let location = match &self.document {
            Some(doc) => doc.location().clone(),
            None => return Ok(false),
        };
        if location.is_void() {
            return self.save_as();
        }
        self.start_save(location)
    }

    /// Ask for a location and save there. Returns whether a save was
    /// started.
    pub fn save_as(&mut self) -> Result<bool> {
        self.ensure_no_save("save as")?;
        if self.document.is_none() {
            return Ok(false);
        }
        let filter = filter_string(self.kind.file_filters());
        let start = self.last_directory();
        let Some(path) = self.prompt.choose_save_file(&filter, start.as_deref()) else {
            return Ok(false);
        };
        let location = Location::from_path(&path)?;
        self.start_save(location)
    }

    /// Close the current document, asking about unsaved changes first.
    pub fn request_close(&mut self) -> Result<CloseOutcome> {
        match self.resolve_unsaved(AfterSave::Close)? {
            Resolution::Proceed => {
                self.finish_close();
                Ok(CloseOutcome::Closed)
            }
            Resolution::Stop => Ok(CloseOutcome::Cancelled),
            Resolution::Deferred => Ok(CloseOutcome::AwaitingSave),
        }
    }

    /// Quit flow: close the document; the caller exits once
    /// [`Self::is_closed`] holds.
    pub fn close_application(&mut self) -> Result<CloseOutcome> {
        if self.is_closed() {
            return Ok(CloseOutcome::Closed);
        }
        self.request_close()
    }

    /// Show or hide the rendered preview. Kinds without one ignore this.
    pub fn toggle_preview(&mut self) -> Result<()> {
        if !self.kind.has_preview() {
            return Ok(());
        }
        let visible = self.widget.is_preview_visible()?;
        self.widget.set_preview_visible(!visible)
    }

    // --- settings ---

    pub fn begin_settings(&self) -> SettingsSession {
        SettingsSession::begin(self.widget.clone(), self.settings.clone())
    }

    /// Keep settings committed or restored by a settings session.
    pub fn settings_changed(&mut self, settings: EditorSettings) {
        self.settings = settings;
    }

    // --- I/O completion ---

    /// Apply the outcome of a load or save. Call on the UI thread.
    pub fn complete_io(&mut self, outcome: IoOutcome) {
        match outcome {
            IoOutcome::Loaded { path, result } => self.finish_load(path, result),
            IoOutcome::Saved { location, result } => self.finish_save(location, result),
        }
    }

    // --- internals ---

    fn ensure_no_save(&self, operation: &str) -> Result<()> {
        if self.save_in_flight {
            return Err(AppError::ConflictingOperation(operation.to_string()));
        }
        if self.state == DocumentState::Loading {
            return Err(AppError::ConflictingOperation(format!("{} while loading", operation)));
        }
        Ok(())
    }

    /// Ask about unsaved changes before the current document goes away.
    fn resolve_unsaved(&mut self, next: AfterSave) -> Result<Resolution> {
        self.ensure_no_save("close")?;
        let name = match &self.document {
            Some(doc) if doc.is_dirty() => {
                if doc.has_location() { doc.name() } else { "Untitled".to_string() }
            }
            _ => return Ok(Resolution::Proceed),
        };

        self.state = DocumentState::Closing;
        match self.prompt.confirm_unsaved(&name) {
            CloseChoice::Discard => {
                tracing::debug!("discarding changes to {}", name);
                Ok(Resolution::Proceed)
            }
            CloseChoice::Cancel => {
                self.cancel_close();
                Ok(Resolution::Stop)
            }
            CloseChoice::Save => {
                self.state = DocumentState::Dirty;
                match self.save() {
                    Ok(true) => {
                        self.after_save = Some(next);
                        Ok(Resolution::Deferred)
                    }
                    Ok(false) => {
                        self.cancel_close();
                        Ok(Resolution::Stop)
                    }
                    Err(e) => {
                        self.cancel_close();
                        Err(e)
                    }
                }
            }
        }
    }

    fn cancel_close(&mut self) {
        self.state = DocumentState::Cancelled;
        tracing::debug!("close cancelled");
        self.state = DocumentState::Dirty;
    }

    fn finish_close(&mut self) {
        self.document = None;
        self.after_save = None;
        self.state = DocumentState::Closed;
        self.dirty.set(false);
        tracing::info!("document closed");
    }

    fn new_document(&mut self) {
        let empty = self.kind.create_empty();
        let hint = self.kind.mode_hint(None);
        if let Err(e) = self.widget.set_content(&empty, &hint) {
            tracing::warn!("could not clear editor: {}", e);
        }
        self.widget.set_read_only(false);
        self.widget.set_dirty(false);

        self.document = Some(Document::void());
        self.state = DocumentState::Clean;
        self.dirty.set(false);
        tracing::debug!("new document");
    }

    fn begin_load(&mut self, path: PathBuf) -> Result<()> {
        self.ensure_no_save("open")?;
        tracing::info!("opening {}", path.display());

        self.state_before_load = match self.state {
            DocumentState::Closing | DocumentState::Cancelled => {
                if self.dirty.get() { DocumentState::Dirty } else { DocumentState::Clean }
            }
            other => other,
        };
        self.state = DocumentState::Loading;

        let kind = Arc::clone(&self.kind);
        let failed_path = path.clone();
        let task = IoTask::new(
            move || {
                let result = kind.load(&path);
                IoOutcome::Loaded { path, result }
            },
            move |e| IoOutcome::Loaded {
                path: failed_path,
                result: Err(e),
            },
        );
        if let Err(e) = self.io.run(task) {
            self.state = self.state_before_load;
            return Err(e);
        }
        Ok(())
    }

    fn finish_load(&mut self, path: PathBuf, result: Result<LoadedText>) {
        let installed = result.and_then(|loaded| {
            let location = Location::from_path(&path)?;
            let hint = self.kind.mode_hint(Some(&path));
            self.widget.set_content(&loaded.text, &hint)?;
            Ok((location, loaded))
        });

        match installed {
            Ok((location, loaded)) => {
                self.widget.set_read_only(loaded.read_only);
                self.widget.set_dirty(false);
                self.remember_location(&location);
                self.document =
                    Some(Document::loaded(location, loaded.encoding, loaded.read_only).with_bom(loaded.bom));
                self.after_save = None;
                self.state = DocumentState::Clean;
                self.dirty.set(false);
                tracing::info!("loaded {} ({})", path.display(), loaded.encoding.name());
            }
            Err(e) => {
                self.state = self.state_before_load;
                self.report(&e);
            }
        }
    }

    fn start_save(&mut self, location: Location) -> Result<bool> {
        let Some(doc) = &self.document else {
            return Ok(false);
        };
        let charset = doc.charset();
        let bom = doc.has_bom();
        let Some(path) = location.path() else {
            return Ok(false);
        };
        let text = self.widget.get_content()?;

        tracing::info!("saving {}", path.display());
        self.save_in_flight = true;
        self.saving_text = Some(text.clone());
        let kind = Arc::clone(&self.kind);
        let failed_location = location.clone();
        let task = IoTask::new(
            move || {
                let result = kind.write(&path, &text, charset, bom);
                IoOutcome::Saved { location, result }
            },
            move |e| IoOutcome::Saved {
                location: failed_location,
                result: Err(e),
            },
        );
        if let Err(e) = self.io.run(task) {
            self.save_in_flight = false;
            self.saving_text = None;
            return Err(e);
        }
        Ok(true)
    }

    fn finish_save(&mut self, location: Location, result: Result<&'static Encoding>) {
        self.save_in_flight = false;
        let saved_text = self.saving_text.take();
        let after = self.after_save.take();

        match result {
            Ok(used) => {
                self.widget.set_read_only(false);
                self.remember_location(&location);
                if let Some(doc) = self.document.as_mut() {
                    doc.saved_as(location, used);
                }

                let current = self.widget.get_content();
                let unchanged = matches!((&saved_text, &current), (Some(saved), Ok(now)) if saved == now);
                if !unchanged {
                    self.keep_edits_after_save(saved_text.as_deref(), after);
                    return;
                }

                self.widget.set_dirty(false);
                self.state = DocumentState::Clean;
                self.dirty.set(false);
                tracing::info!("saved");

                let continued = match after {
                    Some(AfterSave::Close) => {
                        self.finish_close();
                        Ok(())
                    }
                    Some(AfterSave::NewDocument) => {
                        self.new_document();
                        Ok(())
                    }
                    Some(AfterSave::Open(path)) => self.begin_load(path),
                    None => Ok(()),
                };
                if let Err(e) = continued {
                    self.report(&e);
                }
            }
            Err(e) => {
                // the document keeps its changes
                self.state = match &self.document {
                    Some(doc) if doc.is_dirty() => DocumentState::Dirty,
                    Some(_) => DocumentState::Clean,
                    None => DocumentState::Unloaded,
                };
                if after.is_some() {
                    tracing::debug!("pending {:?} dropped after failed save", after);
                }
                self.report(&e);
            }
        }
    }

    /// The editor changed while its text was being written: the file holds
    /// an older version, so the document stays dirty.
    fn keep_edits_after_save(&mut self, saved_text: Option<&str>, after: Option<AfterSave>) {
        tracing::info!("saved; editor changed during the save and stays modified");
        if let Some(doc) = self.document.as_mut() {
            doc.set_dirty(true);
        }
        if let Some(saved) = saved_text {
            if let Err(e) = self.widget.mark_saved(saved) {
                tracing::warn!("could not update editor baseline: {}", e);
            }
        }
        self.state = DocumentState::Dirty;
        self.dirty.set(true);
        if after.is_some() {
            tracing::debug!("pending {:?} dropped: newer edits are unsaved", after);
        }
    }

    fn report(&self, error: &AppError) {
        tracing::error!("{}", error);
        self.prompt.show_error(&error.to_string());
    }

    fn remember_location(&self, location: &Location) {
        let Some(uri) = location.uri() else {
            return;
        };
        let mut prefs = self.prefs.borrow_mut();
        prefs.put_string(APP_NODE, KEY_DOCUMENT_URI, uri);
        if let Err(e) = prefs.save() {
            tracing::warn!("could not store last document: {}", e);
        }
    }

    /// Folder to start file choosers in.
    fn last_directory(&self) -> Option<PathBuf> {
        let from_document = self.document.as_ref().and_then(|d| d.path());
        let path = from_document.or_else(|| {
            let uri = self.prefs.borrow().get_string(APP_NODE, KEY_DOCUMENT_URI, "");
            Location::parse(&uri).and_then(|l| l.path())
        })?;
        path.parent().map(Path::to_path_buf)
    }
}
