//! Controllers layer - orchestration and coordination.
//!
//! This module contains controllers that coordinate between
//! domain models, services, and the UI:
//! - Editor widget facade over the script bridge
//! - Live settings editing
//! - Document lifecycle

pub mod application;
pub mod editor;
pub mod settings_session;

pub use application::{ApplicationController, CloseChoice, CloseOutcome, DocumentState, UserPrompt};
pub use editor::{EditorEvent, EditorWidget};
pub use settings_session::SettingsSession;
