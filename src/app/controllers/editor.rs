//! Typed editor API over a [`ScriptBridge`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Value, json};

use crate::app::bridge::remote::{EDITOR_HANDLE, invocation};
use crate::app::bridge::ScriptBridge;
use crate::app::domain::settings::{EditorSettings, clamp_font_size};
use crate::app::infrastructure::error::{AppError, Result};

/// Notifications from an editor widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// The handshake completed. Delivered at most once per subscription.
    Ready,
    DirtyChanged(bool),
}

#[derive(Clone)]
pub struct EditorWidget {
    bridge: Arc<ScriptBridge>,
}

impl EditorWidget {
    pub fn new(bridge: Arc<ScriptBridge>) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &Arc<ScriptBridge> {
        &self.bridge
    }

    pub fn bind(&self) -> Result<()> {
        self.bridge.bind()
    }

    pub fn is_ready(&self) -> bool {
        self.bridge.is_ready()
    }

    pub fn is_dirty(&self) -> bool {
        self.bridge.is_dirty()
    }

    /// Subscribe to widget events. A subscriber added after the handshake
    /// receives `Ready` right away.
    pub fn subscribe(&self, listener: impl Fn(EditorEvent) + Send + Sync + 'static) {
        let listener = Arc::new(listener);
        // the handshake may finish on another thread between the two checks
        let delivered = Arc::new(AtomicBool::new(false));

        let on_ready = Arc::clone(&listener);
        let ready_once = Arc::clone(&delivered);
        self.bridge.ready_property().subscribe(move |ready| {
            if *ready && !ready_once.swap(true, Ordering::SeqCst) {
                on_ready(EditorEvent::Ready);
            }
        });
        let on_dirty = Arc::clone(&listener);
        self.bridge
            .dirty_property()
            .subscribe(move |dirty| on_dirty(EditorEvent::DirtyChanged(*dirty)));

        if self.is_ready() && !delivered.swap(true, Ordering::SeqCst) {
            listener(EditorEvent::Ready);
        }
    }

    // --- content ---

    /// Replace the content. `mode_hint` selects the editing mode, e.g. a
    /// file extension or `"markdown"`.
    pub fn set_content(&self, text: &str, mode_hint: &str) -> Result<()> {
        self.bridge
            .call("setContent", vec![json!(text), json!(mode_hint)])
            .map(|_| ())
    }

    pub fn get_content(&self) -> Result<String> {
        match self.bridge.call("getContent", vec![])? {
            Value::String(text) => Ok(text),
            Value::Null => Ok(String::new()),
            other => Err(unexpected("getContent", &other)),
        }
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.bridge.set_read_only(read_only);
    }

    pub fn is_read_only(&self) -> bool {
        self.bridge.is_read_only()
    }

    /// Force the dirty state; used to clear it after load and save.
    pub fn set_dirty(&self, dirty: bool) {
        self.bridge.set_dirty(dirty);
    }

    /// Tell the page that `saved` reached disk. The page stays dirty if
    /// its content has moved on since.
    pub fn mark_saved(&self, saved: &str) -> Result<()> {
        self.bridge
            .execute_script_async(invocation(EDITOR_HANDLE, "markSaved", &[json!(saved)]))
    }

    pub fn set_prompt_text(&self, text: &str) {
        self.bridge.set_prompt_text(text);
    }

    // --- preview ---

    pub fn set_preview_visible(&self, visible: bool) -> Result<()> {
        self.bridge
            .call("setPreviewVisible", vec![json!(visible)])
            .map(|_| ())
    }

    pub fn is_preview_visible(&self) -> Result<bool> {
        match self.bridge.call("isPreviewVisible", vec![])? {
            Value::Bool(visible) => Ok(visible),
            other => Err(unexpected("isPreviewVisible", &other)),
        }
    }

    // --- appearance ---

    pub fn set_theme(&self, theme: &str) -> Result<()> {
        self.bridge.call("setTheme", vec![json!(theme)]).map(|_| ())
    }

    pub fn get_theme(&self) -> Result<String> {
        match self.bridge.call("getTheme", vec![])? {
            Value::String(theme) => Ok(theme),
            other => Err(unexpected("getTheme", &other)),
        }
    }

    pub fn set_font_size(&self, size: u32) -> Result<()> {
        self.bridge
            .call("setFontSize", vec![json!(clamp_font_size(size as i64))])
            .map(|_| ())
    }

    pub fn get_font_size(&self) -> Result<u32> {
        let value = self.bridge.call("getFontSize", vec![])?;
        value
            .as_i64()
            .map(clamp_font_size)
            .ok_or_else(|| unexpected("getFontSize", &value))
    }

    pub fn set_show_line_numbers(&self, show: bool) -> Result<()> {
        self.bridge
            .call("setShowLineNumbers", vec![json!(show)])
            .map(|_| ())
    }

    pub fn is_show_line_numbers(&self) -> Result<bool> {
        let value = self.bridge.call("isShowLineNumbers", vec![])?;
        value
            .as_bool()
            .ok_or_else(|| unexpected("isShowLineNumbers", &value))
    }

    pub fn apply(&self, settings: &EditorSettings) -> Result<()> {
        tracing::debug!("applying editor settings {:?}", settings);
        self.set_theme(&settings.theme)?;
        self.set_font_size(settings.font_size())?;
        self.set_show_line_numbers(settings.show_line_numbers)
    }

    /// Read the settings currently in effect in the editor.
    pub fn settings(&self) -> Result<EditorSettings> {
        Ok(EditorSettings::new(
            &self.get_theme()?,
            self.get_font_size()? as i64,
            self.is_show_line_numbers()?,
        ))
    }

    // --- editing ---

    pub fn cut(&self) -> Result<()> {
        self.command("cut")
    }

    pub fn copy(&self) -> Result<()> {
        self.command("copy")
    }

    pub fn paste(&self) -> Result<()> {
        self.command("paste")
    }

    pub fn undo(&self) -> Result<()> {
        self.command("undo")
    }

    pub fn redo(&self) -> Result<()> {
        self.command("redo")
    }

    /// Select the next match of `pattern`. Returns whether one was found.
    pub fn search(&self, pattern: &str, ignore_case: bool, use_regex: bool, wrap_around: bool) -> Result<bool> {
        let found = self.bridge.call(
            "search",
            vec![json!(pattern), json!(ignore_case), json!(use_regex), json!(wrap_around)],
        )?;
        Ok(found.as_bool().unwrap_or(false))
    }

    fn command(&self, method: &str) -> Result<()> {
        self.bridge
            .execute_script_async(invocation(EDITOR_HANDLE, method, &[]))
    }
}

fn unexpected(method: &str, value: &Value) -> AppError {
    AppError::Script {
        script: invocation(EDITOR_HANDLE, method, &[]),
        message: format!("unexpected result {}", value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::bridge::script_bridge::tests::fixture;
    use std::sync::Mutex;

    #[test]
    fn test_calls_before_ready_rejected() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        assert!(matches!(widget.get_content(), Err(AppError::NotReady { .. })));
        assert!(widget.undo().is_err());
        assert!(f.runtime.scripts().is_empty());
    }

    #[test]
    fn test_set_content_escapes_text() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        widget.bind().unwrap();

        widget.set_content("let s = \"x\";\n", "rs").unwrap();
        assert_eq!(
            f.runtime.scripts().last().map(String::as_str),
            Some("editorInstance.setContent('let s = \\\"x\\\";\\n', 'rs');")
        );
    }

    #[test]
    fn test_get_content_and_settings() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        widget.bind().unwrap();
        f.runtime.set_result("getContent", json!("body"));
        f.runtime.set_result("getTheme", json!("monokai"));
        f.runtime.set_result("getFontSize", json!(99));
        f.runtime.set_result("isShowLineNumbers", json!(true));

        assert_eq!(widget.get_content().unwrap(), "body");
        assert_eq!(widget.settings().unwrap(), EditorSettings::new("monokai", 30, true));
    }

    #[test]
    fn test_unexpected_result_is_script_error() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        widget.bind().unwrap();
        f.runtime.set_result("isShowLineNumbers", json!("yes"));
        assert!(matches!(widget.is_show_line_numbers(), Err(AppError::Script { .. })));
    }

    #[test]
    fn test_apply_pushes_every_setting() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        widget.bind().unwrap();

        widget.apply(&EditorSettings::new("eclipse", 12, true)).unwrap();
        let scripts = f.runtime.scripts();
        let tail: Vec<&str> = scripts.iter().rev().take(3).rev().map(String::as_str).collect();
        assert_eq!(
            tail,
            vec![
                "editorInstance.setTheme('eclipse');",
                "editorInstance.setFontSize(12);",
                "editorInstance.setShowLineNumbers(true);",
            ]
        );
    }

    #[test]
    fn test_search_passes_flags() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        widget.bind().unwrap();
        f.runtime.set_result("search", json!(true));

        assert!(widget.search("fo+", true, true, false).unwrap());
        assert_eq!(
            f.runtime.scripts().last().map(String::as_str),
            Some("editorInstance.search('fo+', true, true, false);")
        );
    }

    #[test]
    fn test_edit_commands_are_async() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        widget.bind().unwrap();
        let before = f.runtime.scripts().len();

        widget.undo().unwrap();
        assert_eq!(f.runtime.scripts().len(), before);
        f.queue.run_pending();
        assert_eq!(
            f.runtime.scripts().last().map(String::as_str),
            Some("editorInstance.undo();")
        );
    }

    #[test]
    fn test_subscribe_sees_ready_and_dirty() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        widget.subscribe(move |e| sink.lock().unwrap().push(e));

        widget.bind().unwrap();
        f.bridge.report_dirty(true);
        f.bridge.report_dirty(true);
        f.bridge.report_dirty(false);

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                EditorEvent::Ready,
                EditorEvent::DirtyChanged(true),
                EditorEvent::DirtyChanged(false),
            ]
        );
    }

    #[test]
    fn test_late_subscriber_gets_ready() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        widget.bind().unwrap();

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        widget.subscribe(move |e| sink.lock().unwrap().push(e));
        assert_eq!(*events.lock().unwrap(), vec![EditorEvent::Ready]);
    }

    #[test]
    fn test_ready_delivered_once_when_handshake_races_subscribe() {
        use std::sync::atomic::AtomicUsize;

        for _ in 0..200 {
            let f = fixture();
            let widget = EditorWidget::new(f.bridge.clone());
            let count = Arc::new(AtomicUsize::new(0));
            let sink = Arc::clone(&count);

            let ready = f.bridge.clone();
            let handshake = std::thread::spawn(move || ready.ready_property().set(true));
            widget.subscribe(move |e| {
                if e == EditorEvent::Ready {
                    sink.fetch_add(1, Ordering::SeqCst);
                }
            });
            handshake.join().unwrap();

            assert_eq!(count.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_mark_saved_passes_saved_text() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        widget.bind().unwrap();

        widget.mark_saved("v1").unwrap();
        f.queue.run_pending();
        assert_eq!(
            f.runtime.scripts().last().map(String::as_str),
            Some("editorInstance.markSaved('v1');")
        );
    }

    #[test]
    fn test_preview_visibility_calls() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        widget.bind().unwrap();
        f.runtime.set_result("isPreviewVisible", json!(true));

        widget.set_preview_visible(false).unwrap();
        assert_eq!(
            f.runtime.scripts().last().map(String::as_str),
            Some("editorInstance.setPreviewVisible(false);")
        );
        assert!(widget.is_preview_visible().unwrap());
    }

    #[test]
    fn test_set_dirty_false_tells_runtime() {
        let f = fixture();
        let widget = EditorWidget::new(f.bridge.clone());
        widget.bind().unwrap();
        f.bridge.report_dirty(true);

        widget.set_dirty(false);
        assert!(!widget.is_dirty());
        f.queue.run_pending();
        assert_eq!(
            f.runtime.scripts().last().map(String::as_str),
            Some("editorInstance.setDirty(false);")
        );
    }
}
