//! Link between native code and the script runtime hosting the editor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use serde_json::{Value, json};

use super::escape::quote;
use super::remote::{BRIDGE_GLOBAL, EDITOR_HANDLE, INITIALISED_FLAG, RemoteHandle, invocation};
use crate::app::domain::property::Property;
use crate::app::infrastructure::clipboard::Clipboard;
use crate::app::infrastructure::error::{AppError, Result};
use crate::app::infrastructure::logging::SCRIPT_TARGET;
use crate::app::infrastructure::ui_queue::{UiQueue, submit_and_wait};

/// Global under which the page exposes the object that forwards calls to
/// native code. The handshake publishes it as `window.bridge`.
pub const NATIVE_STUB: &str = "__nativeBridge";

/// Severity of a message logged by the embedded runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl ScriptLogLevel {
    /// Map a console-style level name; unknown names log at info.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "error" | "severe" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "debug" | "fine" => Self::Debug,
            "trace" | "finer" | "finest" => Self::Trace,
            _ => Self::Info,
        }
    }
}

/// Receives log messages sent by the embedded runtime.
pub trait ScriptLogger: Send + Sync {
    fn log(&self, level: ScriptLogLevel, message: &str);
}

/// Re-emits runtime messages as tracing events under [`SCRIPT_TARGET`].
pub struct TracingScriptLogger;

impl ScriptLogger for TracingScriptLogger {
    fn log(&self, level: ScriptLogLevel, message: &str) {
        match level {
            ScriptLogLevel::Error => tracing::error!(target: SCRIPT_TARGET, "{}", message),
            ScriptLogLevel::Warn => tracing::warn!(target: SCRIPT_TARGET, "{}", message),
            ScriptLogLevel::Info => tracing::info!(target: SCRIPT_TARGET, "{}", message),
            ScriptLogLevel::Debug => tracing::debug!(target: SCRIPT_TARGET, "{}", message),
            ScriptLogLevel::Trace => tracing::trace!(target: SCRIPT_TARGET, "{}", message),
        }
    }
}

/// Handler for failures of work that ran detached on the UI thread.
pub type ErrorHandler = Arc<dyn Fn(&AppError) + Send + Sync>;

/// Turns editor content into preview HTML; `None` leaves the preview as is.
pub type PreviewRenderer = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Collaborators a bridge needs.
pub struct BridgeServices {
    pub runtime: Arc<dyn RemoteHandle>,
    pub queue: Arc<dyn UiQueue>,
    pub clipboard: Arc<dyn Clipboard>,
    pub logger: Arc<dyn ScriptLogger>,
}

pub struct ScriptBridge {
    runtime: Arc<dyn RemoteHandle>,
    queue: Arc<dyn UiQueue>,
    clipboard: Arc<dyn Clipboard>,
    logger: Arc<dyn ScriptLogger>,
    error_handler: Mutex<ErrorHandler>,
    preview_renderer: Mutex<Option<PreviewRenderer>>,

    /// Latches true once the handshake succeeded.
    ready: Property<bool>,
    /// Set when the handshake failed; the bridge is unusable afterwards.
    failure: Mutex<Option<String>>,
    bind_scheduled: AtomicBool,

    dirty: Property<bool>,
    read_only: Property<bool>,
    prompt_text: Property<String>,
}

impl ScriptBridge {
    pub fn new(services: BridgeServices) -> Arc<Self> {
        let bridge = Arc::new_cyclic(|weak: &Weak<ScriptBridge>| {
            let read_only = Property::new(false);
            let prompt_text = Property::new(String::new());

            let w = weak.clone();
            read_only.subscribe(move |flag: &bool| {
                if let Some(bridge) = w.upgrade() {
                    bridge.forward("setReadOnly", json!(*flag));
                }
            });
            let w = weak.clone();
            prompt_text.subscribe(move |text: &String| {
                if let Some(bridge) = w.upgrade() {
                    bridge.forward("setPromptText", json!(text));
                }
            });

            let default_handler: ErrorHandler = Arc::new(|e: &AppError| {
                tracing::error!("unhandled error in UI task: {}", e);
            });

            ScriptBridge {
                runtime: services.runtime,
                queue: services.queue,
                clipboard: services.clipboard,
                logger: services.logger,
                error_handler: Mutex::new(default_handler),
                preview_renderer: Mutex::new(None),
                ready: Property::new(false),
                failure: Mutex::new(None),
                bind_scheduled: AtomicBool::new(false),
                dirty: Property::new(false),
                read_only,
                prompt_text,
            }
        });
        tracing::debug!("script bridge created");
        bridge
    }

    // --- handshake ---

    /// Bind the bridge to the runtime.
    ///
    /// On the UI thread the handshake runs now and its outcome is returned.
    /// From any other thread it is deferred to the UI thread and this
    /// returns `Ok` right away; observe [`ScriptBridge::is_ready`] or
    /// [`ScriptBridge::wait_ready`] for completion.
    pub fn bind(self: &Arc<Self>) -> Result<()> {
        if self.is_ready() {
            tracing::warn!("bridge already bound");
            return Ok(());
        }
        if let Some(reason) = self.failure() {
            return Err(AppError::Initialization(reason));
        }

        if self.queue.is_ui_thread() {
            return self.handshake();
        }

        if self.bind_scheduled.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let this = Arc::clone(self);
        self.queue.submit(Box::new(move || {
            if let Err(e) = this.handshake() {
                this.report_detached_error(&e);
            }
        }));
        Ok(())
    }

    fn handshake(&self) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }
        tracing::debug!("setting bridge");

        let pushed_read_only = self.read_only.get();
        let pushed_prompt = self.prompt_text.get();

        let outcome = self.install().and_then(|_| {
            self.runtime
                .call(EDITOR_HANDLE, "setReadOnly", &[json!(pushed_read_only)])?;
            self.runtime
                .call(EDITOR_HANDLE, "setPromptText", &[json!(pushed_prompt)])?;
            Ok(())
        });

        if let Err(e) = outcome {
            let reason = match e {
                AppError::Initialization(reason) => reason,
                other => other.to_string(),
            };
            tracing::error!("editor handshake failed: {}", reason);
            *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(reason.clone());
            return Err(AppError::Initialization(reason));
        }

        self.ready.set(true);
        tracing::info!("bridge set");

        // writes that raced with the handshake
        if self.read_only.get() != pushed_read_only {
            self.forward("setReadOnly", json!(self.read_only.get()));
        }
        if self.prompt_text.get() != pushed_prompt {
            self.forward("setPromptText", json!(self.prompt_text.get()));
        }
        Ok(())
    }

    fn install(&self) -> Result<()> {
        let installed = self.runtime.eval(&format!(
            "window[{bridge}] = window[{stub}] || null; window[{bridge}] !== null",
            bridge = quote(BRIDGE_GLOBAL),
            stub = quote(NATIVE_STUB),
        ))?;
        if installed != Value::Bool(true) {
            return Err(AppError::Initialization(format!(
                "runtime does not expose '{}'",
                NATIVE_STUB
            )));
        }

        let handle_type = self
            .runtime
            .eval(&format!("typeof window[{}]", quote(EDITOR_HANDLE)))?;
        if handle_type != Value::String("object".to_string()) {
            return Err(AppError::Initialization(format!(
                "editor script failed to load: '{}' is {}",
                EDITOR_HANDLE, handle_type
            )));
        }

        // the page sets this flag on the last line of its init script
        let initialised = self.runtime.get_member(INITIALISED_FLAG)?;
        if initialised != Value::Bool(true) {
            return Err(AppError::Initialization(
                "script error during initialization of editor component".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready.get()
    }

    /// Reason the handshake failed, if it did.
    pub fn failure(&self) -> Option<String> {
        self.failure.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn ready_property(&self) -> &Property<bool> {
        &self.ready
    }

    /// Wait for the handshake from a thread other than the UI thread.
    /// On the UI thread this only reports the current state.
    pub fn wait_ready(&self, timeout: Duration) -> bool {
        if self.queue.is_ui_thread() {
            return self.is_ready();
        }
        self.ready.wait_until(|ready| *ready, timeout)
    }

    // --- invocation ---

    /// Call `method` on the editor handle and return its result.
    ///
    /// Blocks a non-UI caller until the UI thread has run the call.
    pub fn call(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        if !self.is_ready() {
            return Err(AppError::NotReady {
                method: method.to_string(),
            });
        }
        tracing::trace!("JS: {} {:?}", method, args);

        if self.queue.is_ui_thread() {
            return call_logged(&*self.runtime, method, &args);
        }

        let runtime = Arc::clone(&self.runtime);
        let method = method.to_string();
        submit_and_wait(&*self.queue, move || call_logged(&*runtime, &method, &args))?
    }

    /// Schedule `script` on the UI thread without waiting for it.
    ///
    /// Failures are logged with the script and handed to the error handler
    /// on the UI thread; the caller has already returned by then.
    pub fn execute_script_async(&self, script: impl Into<String>) -> Result<()> {
        let script = script.into();
        if !self.is_ready() {
            return Err(AppError::NotReady { method: script });
        }

        let runtime = Arc::clone(&self.runtime);
        let handler = self.error_handler();
        self.queue.submit(Box::new(move || {
            if let Err(e) = runtime.eval(&script) {
                tracing::warn!("{} - script: {}", e, script);
                handler(&e);
            }
        }));
        Ok(())
    }

    /// Run `script` now. Only valid on the UI thread.
    pub fn execute_script_sync(&self, script: &str) -> Result<Value> {
        if !self.queue.is_ui_thread() {
            return Err(AppError::WrongThread("execute_script_sync"));
        }
        if !self.is_ready() {
            return Err(AppError::NotReady {
                method: script.to_string(),
            });
        }
        self.runtime.eval(script).map_err(|e| {
            tracing::warn!("{} - script: {}", e, script);
            e
        })
    }

    /// Push a property change on the next UI turn, once ready.
    fn forward(&self, method: &'static str, value: Value) {
        if !self.is_ready() {
            // flushed by the handshake
            return;
        }
        if let Err(e) = self.execute_script_async(invocation(EDITOR_HANDLE, method, &[value])) {
            tracing::warn!("could not forward {}: {}", method, e);
        }
    }

    pub fn set_error_handler(&self, handler: ErrorHandler) {
        *self.error_handler.lock().unwrap_or_else(PoisonError::into_inner) = handler;
    }

    pub fn set_preview_renderer(&self, renderer: PreviewRenderer) {
        *self.preview_renderer.lock().unwrap_or_else(PoisonError::into_inner) = Some(renderer);
    }

    fn error_handler(&self) -> ErrorHandler {
        Arc::clone(&self.error_handler.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn report_detached_error(&self, error: &AppError) {
        (self.error_handler())(error);
    }

    // --- properties ---

    pub fn dirty_property(&self) -> &Property<bool> {
        &self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Force the dirty state, e.g. after a save, and tell the runtime.
    pub fn set_dirty(&self, dirty: bool) {
        self.dirty.set(dirty);
        self.forward("setDirty", json!(dirty));
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.get()
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    pub fn prompt_text(&self) -> String {
        self.prompt_text.get()
    }

    pub fn set_prompt_text(&self, text: &str) {
        self.prompt_text.set(text.to_string());
    }

    // --- callbacks from the runtime ---

    pub fn report_dirty(&self, dirty: bool) {
        tracing::trace!("runtime reports dirty = {}", dirty);
        self.dirty.set(dirty);
    }

    pub fn log(&self, level: ScriptLogLevel, message: &str) {
        self.logger.log(level, message);
    }

    /// Plain-text clipboard content for the runtime, `None` when empty.
    pub fn request_paste(&self) -> Option<String> {
        let content = self.clipboard.get_text();
        match &content {
            Some(text) => tracing::debug!("paste(): {} chars", text.chars().count()),
            None => tracing::debug!("paste() called while clipboard is empty - ignoring"),
        }
        content
    }

    pub fn request_copy(&self, format: &str, content: &str) {
        self.copy_to_clipboard("copy()", format, content);
    }

    /// Render `content` for the preview pane and push the HTML back.
    pub fn request_render(&self, content: &str) {
        let renderer = self
            .preview_renderer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let Some(renderer) = renderer else {
            tracing::debug!("render(): no preview renderer - ignoring");
            return;
        };
        let Some(html) = renderer(content) else {
            return;
        };
        tracing::trace!("render(): {} chars of html", html.len());
        if let Err(e) =
            self.execute_script_async(invocation(EDITOR_HANDLE, "setPreviewHtml", &[json!(html)]))
        {
            tracing::warn!("render(): {}", e);
        }
    }

    /// Copy to the clipboard and remove the selection in the editor.
    pub fn request_cut(&self, format: &str, content: &str) {
        if let Err(e) =
            self.execute_script_async(invocation(EDITOR_HANDLE, "replaceSelection", &[json!("")]))
        {
            tracing::warn!("cut(): could not clear selection: {}", e);
        }
        self.copy_to_clipboard("cut()", format, content);
    }

    fn copy_to_clipboard(&self, task: &str, format: &str, content: &str) {
        match format {
            "text" | "text/plain" => match self.clipboard.set_text(content) {
                Ok(()) => tracing::debug!("{}: plain text, {} chars", task, content.chars().count()),
                Err(e) => tracing::warn!("{}: {}", task, e),
            },
            other => tracing::info!("{}: unsupported clipboard format '{}' ignored", task, other),
        }
    }
}

fn call_logged(runtime: &dyn RemoteHandle, method: &str, args: &[Value]) -> Result<Value> {
    runtime.call(EDITOR_HANDLE, method, args).map_err(|e| {
        tracing::warn!("call to '{}' failed: {}", method, e);
        e
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::app::infrastructure::clipboard::MemoryClipboard;
    use crate::app::infrastructure::ui_queue::ChannelUiQueue;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    /// Scripted stand-in for the embedded page.
    #[derive(Default)]
    pub struct FakeRuntime {
        pub scripts: Mutex<Vec<String>>,
        pub globals: Mutex<HashMap<String, Value>>,
        pub results: Mutex<HashMap<String, Value>>,
        pub fail_on: Mutex<Option<String>>,
    }

    impl FakeRuntime {
        /// A page whose init script completed.
        pub fn healthy() -> Arc<Self> {
            let runtime = Self::default();
            {
                let mut globals = runtime.globals.lock().unwrap();
                globals.insert(NATIVE_STUB.to_string(), json!({}));
                globals.insert(EDITOR_HANDLE.to_string(), json!({}));
                globals.insert(INITIALISED_FLAG.to_string(), json!(true));
            }
            Arc::new(runtime)
        }

        pub fn scripts(&self) -> Vec<String> {
            self.scripts.lock().unwrap().clone()
        }

        pub fn set_result(&self, method: &str, value: Value) {
            self.results.lock().unwrap().insert(method.to_string(), value);
        }

        pub fn fail_scripts_containing(&self, needle: &str) {
            *self.fail_on.lock().unwrap() = Some(needle.to_string());
        }
    }

    impl RemoteHandle for FakeRuntime {
        fn eval(&self, script: &str) -> Result<Value> {
            self.scripts.lock().unwrap().push(script.to_string());
            if let Some(needle) = self.fail_on.lock().unwrap().as_deref() {
                if script.contains(needle) {
                    return Err(AppError::Script {
                        script: script.to_string(),
                        message: "TypeError: not a function".to_string(),
                    });
                }
            }
            let globals = self.globals.lock().unwrap();
            if script.starts_with("window['bridge']") {
                return Ok(json!(globals.contains_key(NATIVE_STUB)));
            }
            if script.starts_with("typeof window[") {
                let kind = if globals.contains_key(EDITOR_HANDLE) { "object" } else { "undefined" };
                return Ok(json!(kind));
            }
            if script.contains(INITIALISED_FLAG) {
                return Ok(globals.get(INITIALISED_FLAG).cloned().unwrap_or(Value::Null));
            }
            for (method, value) in self.results.lock().unwrap().iter() {
                if script.starts_with(&format!("{}.{}(", EDITOR_HANDLE, method)) {
                    return Ok(value.clone());
                }
            }
            Ok(Value::Null)
        }
    }

    pub struct Fixture {
        pub runtime: Arc<FakeRuntime>,
        pub queue: ChannelUiQueue,
        pub clipboard: Arc<MemoryClipboard>,
        pub bridge: Arc<ScriptBridge>,
    }

    pub fn fixture_with(runtime: Arc<FakeRuntime>) -> Fixture {
        let queue = ChannelUiQueue::new();
        queue.claim_current_thread();
        let clipboard = Arc::new(MemoryClipboard::new());
        let bridge = ScriptBridge::new(BridgeServices {
            runtime: runtime.clone(),
            queue: Arc::new(queue.clone()),
            clipboard: clipboard.clone(),
            logger: Arc::new(TracingScriptLogger),
        });
        Fixture {
            runtime,
            queue,
            clipboard,
            bridge,
        }
    }

    pub fn fixture() -> Fixture {
        fixture_with(FakeRuntime::healthy())
    }

    #[test]
    fn test_call_before_bind_never_reaches_runtime() {
        let f = fixture();
        let err = f.bridge.call("getContent", vec![]).unwrap_err();
        assert!(matches!(err, AppError::NotReady { ref method } if method == "getContent"));
        assert!(err.is_bridge_call_error());
        assert!(f.runtime.scripts().is_empty());
    }

    #[test]
    fn test_scripts_before_bind_rejected() {
        let f = fixture();
        assert!(f.bridge.execute_script_async("editorInstance.undo();").is_err());
        assert!(f.bridge.execute_script_sync("1 + 1").is_err());
        f.queue.run_pending();
        assert!(f.runtime.scripts().is_empty());
    }

    #[test]
    fn test_bind_on_ui_thread_pushes_buffered_properties() {
        let f = fixture();
        f.bridge.set_read_only(true);
        f.bridge.set_prompt_text("Type 'here'");
        assert!(f.runtime.scripts().is_empty());

        f.bridge.bind().unwrap();
        assert!(f.bridge.is_ready());

        let scripts = f.runtime.scripts();
        assert!(scripts.contains(&"editorInstance.setReadOnly(true);".to_string()));
        assert!(scripts.contains(&"editorInstance.setPromptText('Type \\'here\\'');".to_string()));
    }

    #[test]
    fn test_property_writes_after_ready_forwarded_next_turn() {
        let f = fixture();
        f.bridge.bind().unwrap();
        let before = f.runtime.scripts().len();

        f.bridge.set_read_only(true);
        assert_eq!(f.runtime.scripts().len(), before);
        f.queue.run_pending();
        assert_eq!(
            f.runtime.scripts().last().map(String::as_str),
            Some("editorInstance.setReadOnly(true);")
        );
    }

    #[test]
    fn test_bind_fails_without_editor_handle() {
        let runtime = FakeRuntime::healthy();
        runtime.globals.lock().unwrap().remove(EDITOR_HANDLE);
        let f = fixture_with(runtime);

        let err = f.bridge.bind().unwrap_err();
        assert!(matches!(err, AppError::Initialization(_)));
        assert!(!f.bridge.is_ready());
        assert!(f.bridge.failure().is_some());
        // fatal for this instance
        assert!(matches!(f.bridge.bind(), Err(AppError::Initialization(_))));
    }

    #[test]
    fn test_bind_fails_when_init_script_did_not_finish() {
        let runtime = FakeRuntime::healthy();
        runtime
            .globals
            .lock()
            .unwrap()
            .insert(INITIALISED_FLAG.to_string(), json!(false));
        let f = fixture_with(runtime);
        assert!(matches!(f.bridge.bind(), Err(AppError::Initialization(_))));
    }

    #[test]
    fn test_bind_from_other_thread_is_deferred() {
        let f = fixture();
        let bridge = Arc::clone(&f.bridge);
        std::thread::spawn(move || bridge.bind().unwrap()).join().unwrap();

        assert!(!f.bridge.is_ready());
        f.queue.run_pending();
        assert!(f.bridge.is_ready());
    }

    #[test]
    fn test_ready_visible_from_any_thread() {
        let f = fixture();
        f.bridge.bind().unwrap();
        let bridge = Arc::clone(&f.bridge);
        let seen = std::thread::spawn(move || bridge.is_ready() && bridge.wait_ready(Duration::ZERO))
            .join()
            .unwrap();
        assert!(seen);
    }

    #[test]
    fn test_call_from_worker_runs_on_ui_thread() {
        let f = fixture();
        f.bridge.bind().unwrap();
        f.runtime.set_result("getFontSize", json!(17));

        let bridge = Arc::clone(&f.bridge);
        let worker = std::thread::spawn(move || bridge.call("getFontSize", vec![]));
        // serve the hand-off like the UI loop would
        while !worker.is_finished() {
            f.queue.run_pending();
            std::thread::yield_now();
        }
        assert_eq!(worker.join().unwrap().unwrap(), json!(17));
    }

    #[test]
    fn test_sync_execution_off_ui_thread_fails_fast() {
        let f = fixture();
        f.bridge.bind().unwrap();
        let bridge = Arc::clone(&f.bridge);
        let result = std::thread::spawn(move || bridge.execute_script_sync("1"))
            .join()
            .unwrap();
        assert!(matches!(result, Err(AppError::WrongThread(_))));
    }

    #[test]
    fn test_sync_script_error_returned_to_caller() {
        let f = fixture();
        f.bridge.bind().unwrap();
        f.runtime.fail_scripts_containing("boom");
        let err = f.bridge.execute_script_sync("boom()").unwrap_err();
        assert!(matches!(err, AppError::Script { ref script, .. } if script == "boom()"));
    }

    #[test]
    fn test_async_script_error_goes_to_handler() {
        let f = fixture();
        f.bridge.bind().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        f.bridge.set_error_handler(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        f.runtime.fail_scripts_containing("boom");

        assert!(f.bridge.execute_script_async("boom()").is_ok());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        f.queue.run_pending();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        // still usable
        assert!(f.bridge.call("getContent", vec![]).is_ok());
    }

    #[test]
    fn test_report_dirty_updates_property() {
        let f = fixture();
        f.bridge.report_dirty(true);
        assert!(f.bridge.is_dirty());
        f.bridge.report_dirty(false);
        assert!(!f.bridge.is_dirty());
    }

    #[test]
    fn test_copy_and_paste_plain_text() {
        let f = fixture();
        assert_eq!(f.bridge.request_paste(), None);
        f.bridge.request_copy("text", "hello");
        assert_eq!(f.bridge.request_paste().as_deref(), Some("hello"));
    }

    #[test]
    fn test_unsupported_format_ignored() {
        let f = fixture();
        f.bridge.request_copy("text/html", "<b>x</b>");
        assert_eq!(f.clipboard.get_text(), None);
    }

    #[test]
    fn test_cut_clears_selection() {
        let f = fixture();
        f.bridge.bind().unwrap();
        f.bridge.request_cut("text", "gone");
        f.queue.run_pending();
        assert_eq!(f.clipboard.get_text().as_deref(), Some("gone"));
        assert_eq!(
            f.runtime.scripts().last().map(String::as_str),
            Some("editorInstance.replaceSelection('');")
        );
    }

    #[test]
    fn test_log_level_names() {
        assert_eq!(ScriptLogLevel::from_name("WARNING"), ScriptLogLevel::Warn);
        assert_eq!(ScriptLogLevel::from_name("log"), ScriptLogLevel::Info);
        assert_eq!(ScriptLogLevel::from_name("error"), ScriptLogLevel::Error);
    }
}
