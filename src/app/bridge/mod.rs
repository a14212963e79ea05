//! Bridge layer - the call channel into the embedded editor page.
//!
//! - `escape` - string escaping for generated script
//! - `remote` - the runtime seen as a `RemoteHandle`
//! - `script_bridge` - handshake, invocation and runtime callbacks
//! - `inbound` - decoding of messages posted by the page

pub mod escape;
pub mod inbound;
pub mod remote;
pub mod script_bridge;

pub use remote::RemoteHandle;
pub use script_bridge::{BridgeServices, ScriptBridge, ScriptLogLevel, ScriptLogger, TracingScriptLogger};
