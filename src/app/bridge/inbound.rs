//! Messages posted by the page through `window.ipc.postMessage`.

use serde::Deserialize;
use serde_json::json;

use super::remote::{EDITOR_HANDLE, invocation};
use super::script_bridge::{ScriptBridge, ScriptLogLevel};
use crate::app::infrastructure::error::Result;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RuntimeMessage {
    Dirty {
        value: bool,
    },
    Log {
        #[serde(default)]
        level: String,
        message: String,
    },
    Copy {
        format: String,
        content: String,
    },
    Cut {
        format: String,
        content: String,
    },
    Paste,
    Render {
        content: String,
    },
}

impl RuntimeMessage {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Route a runtime message to the matching bridge callback.
pub fn dispatch(bridge: &ScriptBridge, message: RuntimeMessage) {
    match message {
        RuntimeMessage::Dirty { value } => bridge.report_dirty(value),
        RuntimeMessage::Log { level, message } => {
            bridge.log(ScriptLogLevel::from_name(&level), &message)
        }
        RuntimeMessage::Copy { format, content } => bridge.request_copy(&format, &content),
        RuntimeMessage::Cut { format, content } => bridge.request_cut(&format, &content),
        RuntimeMessage::Paste => {
            if let Some(text) = bridge.request_paste() {
                let script = invocation(EDITOR_HANDLE, "replaceSelection", &[json!(text)]);
                if let Err(e) = bridge.execute_script_async(script) {
                    tracing::warn!("paste(): {}", e);
                }
            }
        }
        RuntimeMessage::Render { content } => bridge.request_render(&content),
    }
}

/// Parse and dispatch one raw IPC payload. Malformed payloads are logged.
pub fn dispatch_raw(bridge: &ScriptBridge, raw: &str) {
    match RuntimeMessage::parse(raw) {
        Ok(message) => dispatch(bridge, message),
        Err(e) => tracing::warn!("malformed message from page: {} ({})", raw, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::bridge::script_bridge::tests::fixture;
    use crate::app::infrastructure::clipboard::Clipboard;
    use std::sync::Arc;

    #[test]
    fn test_parse_envelopes() {
        assert_eq!(
            RuntimeMessage::parse(r#"{"kind":"dirty","value":true}"#).unwrap(),
            RuntimeMessage::Dirty { value: true }
        );
        assert_eq!(
            RuntimeMessage::parse(r#"{"kind":"paste"}"#).unwrap(),
            RuntimeMessage::Paste
        );
        assert_eq!(
            RuntimeMessage::parse(r#"{"kind":"log","message":"hi"}"#).unwrap(),
            RuntimeMessage::Log {
                level: String::new(),
                message: "hi".to_string()
            }
        );
        assert!(RuntimeMessage::parse(r#"{"kind":"explode"}"#).is_err());
    }

    #[test]
    fn test_dirty_message_updates_bridge() {
        let f = fixture();
        dispatch_raw(&f.bridge, r#"{"kind":"dirty","value":true}"#);
        assert!(f.bridge.is_dirty());
    }

    #[test]
    fn test_copy_message_fills_clipboard() {
        let f = fixture();
        dispatch_raw(&f.bridge, r#"{"kind":"copy","format":"text/plain","content":"abc"}"#);
        assert_eq!(f.clipboard.get_text().as_deref(), Some("abc"));
    }

    #[test]
    fn test_paste_message_inserts_clipboard_text() {
        let f = fixture();
        f.bridge.bind().unwrap();
        f.clipboard.set_text("it's").unwrap();

        dispatch_raw(&f.bridge, r#"{"kind":"paste"}"#);
        f.queue.run_pending();
        assert_eq!(
            f.runtime.scripts().last().map(String::as_str),
            Some("editorInstance.replaceSelection('it\\'s');")
        );
    }

    #[test]
    fn test_paste_with_empty_clipboard_does_nothing() {
        let f = fixture();
        f.bridge.bind().unwrap();
        let before = f.runtime.scripts().len();
        dispatch_raw(&f.bridge, r#"{"kind":"paste"}"#);
        f.queue.run_pending();
        assert_eq!(f.runtime.scripts().len(), before);
    }

    #[test]
    fn test_render_message_pushes_preview_html() {
        let f = fixture();
        f.bridge.bind().unwrap();
        f.bridge
            .set_preview_renderer(Arc::new(|text: &str| Some(format!("<p>{}</p>", text))));

        dispatch_raw(&f.bridge, r#"{"kind":"render","content":"hi"}"#);
        f.queue.run_pending();
        assert_eq!(
            f.runtime.scripts().last().map(String::as_str),
            Some("editorInstance.setPreviewHtml('<p>hi</p>');")
        );
    }

    #[test]
    fn test_render_without_renderer_does_nothing() {
        let f = fixture();
        f.bridge.bind().unwrap();
        let before = f.runtime.scripts().len();
        dispatch_raw(&f.bridge, r#"{"kind":"render","content":"hi"}"#);
        f.queue.run_pending();
        assert_eq!(f.runtime.scripts().len(), before);
    }

    #[test]
    fn test_malformed_payload_ignored() {
        let f = fixture();
        dispatch_raw(&f.bridge, "not json");
        assert!(!f.bridge.is_dirty());
    }
}
