//! Embedded editor page hosted inside the main FLTK window.
//!
//! On Linux and the BSDs the page runs in a WRY WebView created as an X11
//! child of the FLTK window; GTK is pumped from the FLTK event loop. Script
//! evaluation is asynchronous in the webview, so [`WebViewHandle`] pumps
//! events until the reply arrives.

use serde::Deserialize;
use serde_json::Value;

use crate::app::bridge::escape::quote;
use crate::app::infrastructure::error::{AppError, Result};

pub const EDITOR_HTML: &str = include_str!("../../assets/editor.html");

/// Wrap `script` so its completion value, or the exception it raised,
/// comes back as JSON.
pub fn guarded(script: &str) -> String {
    format!(
        "(function() {{ try {{ var v = (0, eval)({}); \
         return JSON.stringify({{ ok: v === undefined ? null : v }}); }} \
         catch (e) {{ return JSON.stringify({{ error: String(e) }}); }} }})()",
        quote(script)
    )
}

#[derive(Deserialize)]
struct Reply {
    #[serde(default)]
    ok: Value,
    #[serde(default)]
    error: Option<String>,
}

/// Decode what the webview hands back for a [`guarded`] script. The value
/// arrives JSON-encoded once more by the webview itself.
pub fn decode_reply(script: &str, raw: &str) -> Result<Value> {
    let unreadable = |e: serde_json::Error| AppError::Script {
        script: script.to_string(),
        message: format!("unreadable reply: {}", e),
    };

    let outer: Value = serde_json::from_str(raw).map_err(unreadable)?;
    let reply: Reply = match outer {
        Value::String(inner) => serde_json::from_str(&inner).map_err(unreadable)?,
        other => serde_json::from_value(other).map_err(unreadable)?,
    };

    match reply.error {
        Some(message) => Err(AppError::Script {
            script: script.to_string(),
            message,
        }),
        None => Ok(reply.ok),
    }
}

#[cfg(all(feature = "webview", not(target_os = "windows")))]
mod host {
    use std::cell::{OnceCell, RefCell};
    use std::os::raw::c_ulong;
    use std::rc::Rc;
    use std::sync::{Arc, Mutex, PoisonError};
    use std::thread::{self, ThreadId};
    use std::time::{Duration, Instant};

    use fltk::{app::Sender, prelude::*, window::Window};
    use raw_window_handle::{
        HandleError, HasWindowHandle, RawWindowHandle, WindowHandle, XlibWindowHandle,
    };
    use serde_json::Value;
    use wry::dpi::{LogicalPosition, LogicalSize};
    use wry::{PageLoadEvent, Rect, WebView, WebViewBuilder};

    use super::{EDITOR_HTML, decode_reply, guarded};
    use crate::app::bridge::inbound;
    use crate::app::bridge::{RemoteHandle, ScriptBridge};
    use crate::app::domain::messages::Message;
    use crate::app::infrastructure::error::{AppError, Result};

    const EVAL_TIMEOUT: Duration = Duration::from_secs(5);

    thread_local! {
        static WEBVIEW: RefCell<Option<WebView>> = const { RefCell::new(None) };
    }

    /// The FLTK window as a parent for the webview.
    struct FltkParent(c_ulong);

    impl HasWindowHandle for FltkParent {
        fn window_handle(&self) -> std::result::Result<WindowHandle<'_>, HandleError> {
            let raw = RawWindowHandle::Xlib(XlibWindowHandle::new(self.0));
            // SAFETY: the handle names the main FLTK window, which is shown
            // before the webview is created and outlives it.
            Ok(unsafe { WindowHandle::borrow_raw(raw) })
        }
    }

    fn bounds(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect {
            position: LogicalPosition::new(x, y).into(),
            size: LogicalSize::new(w.max(1) as u32, h.max(1) as u32).into(),
        }
    }

    pub struct EditorPane {
        bridge: Rc<OnceCell<Arc<ScriptBridge>>>,
    }

    impl EditorPane {
        /// Create the webview over the area `(x, y, w, h)` of `window`,
        /// which must already be shown.
        pub fn attach(
            window: &Window,
            area: (i32, i32, i32, i32),
            sender: Sender<Message>,
        ) -> Result<(Self, Arc<dyn RemoteHandle>)> {
            gtk::init().map_err(|e| AppError::Initialization(format!("GTK: {}", e)))?;

            let parent = FltkParent(window.raw_handle() as c_ulong);
            let bridge: Rc<OnceCell<Arc<ScriptBridge>>> = Rc::default();
            let ipc_bridge = Rc::clone(&bridge);
            let (x, y, w, h) = area;

            let webview = WebViewBuilder::new()
                .with_html(EDITOR_HTML)
                .with_bounds(bounds(x, y, w, h))
                .with_ipc_handler(move |request| match ipc_bridge.get() {
                    Some(bridge) => inbound::dispatch_raw(bridge, request.body()),
                    None => tracing::debug!("message before bridge setup: {}", request.body()),
                })
                .with_on_page_load_handler(move |event, url| {
                    if matches!(event, PageLoadEvent::Finished) {
                        tracing::debug!("editor page loaded: {}", url);
                        sender.send(Message::PageLoaded);
                    }
                })
                .build_as_child(&parent)
                .map_err(|e| AppError::Initialization(format!("WebView: {}", e)))?;

            WEBVIEW.with(|cell| *cell.borrow_mut() = Some(webview));
            tracing::info!("editor webview created");

            let handle: Arc<dyn RemoteHandle> = Arc::new(WebViewHandle {
                ui_thread: thread::current().id(),
            });
            Ok((Self { bridge }, handle))
        }

        /// Route messages posted by the page to `bridge`.
        pub fn connect(&self, bridge: Arc<ScriptBridge>) {
            if self.bridge.set(bridge).is_err() {
                tracing::warn!("editor pane already connected");
            }
        }

        pub fn resize(&self, x: i32, y: i32, w: i32, h: i32) {
            WEBVIEW.with(|cell| {
                if let Some(webview) = cell.borrow().as_ref() {
                    if let Err(e) = webview.set_bounds(bounds(x, y, w, h)) {
                        tracing::warn!("could not resize webview: {}", e);
                    }
                }
            });
        }

        /// Run pending GTK events. Call once per FLTK loop iteration.
        pub fn pump() {
            while gtk::events_pending() {
                gtk::main_iteration_do(false);
            }
        }
    }

    /// [`RemoteHandle`] over the thread-local webview.
    struct WebViewHandle {
        ui_thread: ThreadId,
    }

    impl RemoteHandle for WebViewHandle {
        fn eval(&self, script: &str) -> Result<Value> {
            if thread::current().id() != self.ui_thread {
                return Err(AppError::WrongThread("webview eval"));
            }

            let reply: Arc<Mutex<Option<String>>> = Arc::default();
            let slot = Arc::clone(&reply);
            WEBVIEW.with(|cell| {
                let guard = cell.borrow();
                let webview = guard
                    .as_ref()
                    .ok_or_else(|| AppError::Initialization("webview not created".to_string()))?;
                webview
                    .evaluate_script_with_callback(&guarded(script), move |raw| {
                        *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw);
                    })
                    .map_err(|e| AppError::Script {
                        script: script.to_string(),
                        message: e.to_string(),
                    })
            })?;

            let deadline = Instant::now() + EVAL_TIMEOUT;
            loop {
                let raw = reply.lock().unwrap_or_else(PoisonError::into_inner).take();
                if let Some(raw) = raw {
                    return decode_reply(script, &raw);
                }
                if Instant::now() >= deadline {
                    return Err(AppError::Script {
                        script: script.to_string(),
                        message: "no reply from page".to_string(),
                    });
                }
                if gtk::events_pending() {
                    gtk::main_iteration_do(false);
                } else {
                    thread::sleep(Duration::from_millis(1));
                }
            }
        }
    }
}

#[cfg(not(all(feature = "webview", not(target_os = "windows"))))]
mod host {
    use std::sync::Arc;

    use fltk::{app::Sender, window::Window};
    use serde_json::Value;

    use crate::app::bridge::{RemoteHandle, ScriptBridge};
    use crate::app::domain::messages::Message;
    use crate::app::infrastructure::error::{AppError, Result};

    // Stub - no embedded webview in this build
    pub struct EditorPane;

    struct Unavailable;

    impl RemoteHandle for Unavailable {
        fn eval(&self, _script: &str) -> Result<Value> {
            Err(AppError::Initialization(
                "embedded editor is not available in this build".to_string(),
            ))
        }
    }

    impl EditorPane {
        pub fn attach(
            _window: &Window,
            _area: (i32, i32, i32, i32),
            sender: Sender<Message>,
        ) -> Result<(Self, Arc<dyn RemoteHandle>)> {
            // the handshake reports the failure
            sender.send(Message::PageLoaded);
            Ok((Self, Arc::new(Unavailable)))
        }

        pub fn connect(&self, _bridge: Arc<ScriptBridge>) {}
        pub fn resize(&self, _x: i32, _y: i32, _w: i32, _h: i32) {}
        pub fn pump() {}
    }
}

pub use host::EditorPane;
