//! The embedded runtime as seen from native code.
//!
//! Values crossing the boundary are JSON values. Arguments are rendered
//! into script source with every string escaped.

use serde_json::Value;

use super::escape::quote;
use crate::app::infrastructure::error::Result;

/// Global name of the editor object exposed by the embedded page.
pub const EDITOR_HANDLE: &str = "editorInstance";

/// Global flag the page sets once its init script ran to the end.
pub const INITIALISED_FLAG: &str = "editor_initialised";

/// Global name under which native code installs its callback object.
pub const BRIDGE_GLOBAL: &str = "bridge";

/// Capability to evaluate script in an embedded runtime.
///
/// Implementations must only be used from the UI thread; they are
/// `Send + Sync` so the bridge can carry them into UI tasks.
pub trait RemoteHandle: Send + Sync {
    /// Evaluate `script` in the runtime's global scope and return its
    /// JSON-converted completion value.
    fn eval(&self, script: &str) -> Result<Value>;

    /// Invoke `method` on the global object `target`.
    fn call(&self, target: &str, method: &str, args: &[Value]) -> Result<Value> {
        self.eval(&invocation(target, method, args))
    }

    /// Read a member of the global scope.
    fn get_member(&self, name: &str) -> Result<Value> {
        self.eval(&format!("(typeof window[{0}] === 'undefined') ? null : window[{0}]", quote(name)))
    }

    /// Read an indexed slot of the global object `target`.
    fn get_slot(&self, target: &str, index: usize) -> Result<Value> {
        self.eval(&format!("window[{}][{}]", quote(target), index))
    }
}

/// Render `target.method(args...)` as script source.
pub fn invocation(target: &str, method: &str, args: &[Value]) -> String {
    let rendered: Vec<String> = args.iter().map(to_script_literal).collect();
    format!("{}.{}({});", target, method, rendered.join(", "))
}

/// Render a JSON value as a script literal, escaping every string.
pub fn to_script_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(to_script_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), to_script_literal(v)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
    }
}
