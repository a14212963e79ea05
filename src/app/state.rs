//! Application shell: builds the window and the editor, then runs the
//! message loop until the controller has closed.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use fltk::{
    app::{self, Sender},
    dialog,
    enums::Event,
    prelude::*,
};

use super::bridge::{BridgeServices, ScriptBridge, TracingScriptLogger};
use super::controllers::{ApplicationController, CloseOutcome, EditorWidget};
use super::domain::messages::Message;
use super::infrastructure::cli::Cli;
use super::infrastructure::clipboard::SystemClipboard;
use super::infrastructure::error::{AppError, Result};
use super::infrastructure::io_runner::ThreadIoRunner;
use super::infrastructure::logging;
use super::infrastructure::preferences::Preferences;
use super::infrastructure::ui_queue::FltkUiQueue;
use super::services::kinds::DocumentKind;
use crate::ui::dialogs::about::show_about_dialog;
use crate::ui::dialogs::find::{FindOptions, show_find_dialog};
use crate::ui::dialogs::settings_dialog::show_settings_dialog;
use crate::ui::editor_pane::EditorPane;
use crate::ui::main_window::{MainWidgets, build_main_window, show_status};
use crate::ui::menu::build_menu;
use crate::ui::prompts::FltkPrompt;

type Area = (i32, i32, i32, i32);

fn area_of(widgets: &MainWidgets) -> Area {
    let pane = &widgets.pane;
    (pane.x(), pane.y(), pane.w(), pane.h())
}

pub struct AppState<K: DocumentKind> {
    pub controller: ApplicationController<K>,
    pub widgets: MainWidgets,
    pub pane: EditorPane,
    pub find: FindOptions,
    pane_area: Area,
}

impl<K: DocumentKind> AppState<K> {
    fn widget(&self) -> &EditorWidget {
        self.controller.widget()
    }

    pub fn update_window_title(&mut self) {
        let title = self.controller.title();
        if self.widgets.wind.label() != title {
            self.widgets.wind.set_label(&title);
        }
    }

    /// Keep the webview over the placeholder after the window was resized.
    pub fn sync_pane_bounds(&mut self) {
        let area = area_of(&self.widgets);
        if area != self.pane_area {
            self.pane_area = area;
            let (x, y, w, h) = area;
            self.pane.resize(x, y, w, h);
        }
    }

    pub fn handle(&mut self, msg: Message) {
        match msg {
            Message::PageLoaded => self.bind_editor(),
            Message::EditorEvents => self.controller.process_editor_events(),
            Message::Io(outcome) => self.controller.complete_io(outcome),

            Message::FileNew => {
                let result = self.controller.request_new();
                self.report(result);
            }
            Message::FileOpen => {
                let result = self.controller.request_open(None);
                self.report(result);
            }
            Message::FileSave => {
                let result = self.controller.save().map(|_| ());
                self.report(result);
            }
            Message::FileSaveAs => {
                let result = self.controller.save_as().map(|_| ());
                self.report(result);
            }
            Message::FileQuit | Message::WindowClose => self.quit(),

            Message::EditUndo => self.edit(EditorWidget::undo),
            Message::EditRedo => self.edit(EditorWidget::redo),
            Message::EditCut => self.edit(EditorWidget::cut),
            Message::EditCopy => self.edit(EditorWidget::copy),
            Message::EditPaste => self.edit(EditorWidget::paste),

            Message::ShowFind => {
                if self.widget().is_ready() {
                    self.find = show_find_dialog(self.controller.widget(), &self.find);
                }
            }
            Message::TogglePreview => {
                let result = self.controller.toggle_preview();
                self.report(result);
            }
            Message::OpenSettings => self.open_settings(),
            Message::ShowAbout => show_about_dialog(self.controller.kind().app_name()),
        }
        self.update_window_title();
    }

    fn bind_editor(&mut self) {
        if let Err(e) = self.widget().bind() {
            tracing::error!("editor failed to load: {}", e);
            show_status(&mut self.widgets, &format!("The editor failed to load: {}", e));
            self.sync_pane_bounds();
        }
    }

    fn edit(&self, command: fn(&EditorWidget) -> Result<()>) {
        if let Err(e) = command(self.widget()) {
            tracing::debug!("edit command skipped: {}", e);
        }
    }

    fn open_settings(&mut self) {
        if !self.widget().is_ready() {
            return;
        }
        let session = self.controller.begin_settings();
        let prefs = Rc::clone(self.controller.preferences());
        let (settings, result) = show_settings_dialog(session, &mut prefs.borrow_mut());
        self.controller.settings_changed(settings);
        self.report(result);
    }

    fn quit(&mut self) {
        match self.controller.close_application() {
            Ok(CloseOutcome::Closed) => tracing::info!("closing"),
            Ok(CloseOutcome::AwaitingSave) => tracing::debug!("closing after save"),
            Ok(CloseOutcome::Cancelled) => tracing::debug!("close cancelled"),
            Err(e) => self.report::<()>(Err(e)),
        }
    }

    fn report<T>(&self, result: Result<T>) {
        if let Err(e) = result {
            tracing::warn!("{}", e);
            if !e.is_bridge_call_error() {
                dialog::alert_default(&e.to_string());
            }
        }
    }
}

fn build_editor(
    widgets: &MainWidgets,
    sender: Sender<Message>,
) -> Result<(EditorPane, EditorWidget)> {
    let (pane, runtime) = EditorPane::attach(&widgets.wind, area_of(widgets), sender)?;

    let bridge = ScriptBridge::new(BridgeServices {
        runtime,
        queue: Arc::new(FltkUiQueue::new()),
        clipboard: Arc::new(SystemClipboard::new()),
        logger: Arc::new(TracingScriptLogger),
    });
    bridge.set_error_handler(Arc::new(|e: &AppError| {
        tracing::warn!("editor call failed: {}", e);
    }));
    pane.connect(Arc::clone(&bridge));

    Ok((pane, EditorWidget::new(bridge)))
}

/// Run an editor variant until the user quits.
pub fn run<K: DocumentKind>(kind: K, cli: Cli) -> Result<()> {
    logging::init(cli.log_level, cli.log_level_global);
    tracing::info!("starting {} {}", kind.app_name(), env!("CARGO_PKG_VERSION"));

    let _app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();
    let prefs = Rc::new(RefCell::new(Preferences::load_for_app(kind.app_name())));

    let mut widgets = build_main_window(kind.app_name());
    build_menu(&mut widgets.menu, &sender, kind.app_name(), kind.has_preview());
    widgets.wind.set_callback({
        let s = sender;
        move |_| {
            // Escape also lands here; only the window manager's close counts
            if app::event() == Event::Close {
                s.send(Message::WindowClose);
            }
        }
    });
    widgets.wind.show();

    let (pane, widget) = build_editor(&widgets, sender)?;

    let notify = {
        let s = sender;
        move || {
            s.send(Message::EditorEvents);
            app::awake();
        }
    };
    let mut controller = ApplicationController::new(
        kind,
        widget,
        Box::new(FltkPrompt),
        Box::new(ThreadIoRunner::new(sender)),
        prefs,
        notify,
    );
    controller.set_initial_file(cli.file);

    let pane_area = area_of(&widgets);
    let mut state = AppState {
        controller,
        widgets,
        pane,
        find: FindOptions::default(),
        pane_area,
    };
    state.update_window_title();

    while !state.controller.is_closed() {
        if let Err(e) = app::wait_for(0.01) {
            tracing::error!("event loop failed: {:?}", e);
            break;
        }
        EditorPane::pump();
        state.sync_pane_bounds();
        while let Some(msg) = receiver.recv() {
            state.handle(msg);
        }
    }

    state.widgets.wind.hide();
    tracing::info!("{} closed", state.controller.kind().app_name());
    Ok(())
}
