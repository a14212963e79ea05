//! Application layer.
//!
//! # Structure
//!
//! - `bridge/` - Call channel to the script runtime in the webview
//! - `domain/` - Core data structures (Document, EditorSettings, Messages)
//! - `controllers/` - Orchestration (EditorWidget, ApplicationController)
//! - `services/` - File loading and saving, document kinds
//! - `infrastructure/` - Threads, clipboard, preferences, logging, errors
//! - `state.rs` - Main window and message loop

pub mod bridge;
pub mod controllers;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use controllers::{ApplicationController, EditorWidget};
pub use domain::{Document, EditorSettings, Location, Message};
pub use infrastructure::cli::Cli;
pub use infrastructure::error::{AppError, Result};
pub use services::kinds::{CodeDocumentKind, DocumentKind, MarkdownDocumentKind};
pub use state::run;
