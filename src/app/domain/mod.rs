//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental domain models:
//! - Document and its location
//! - Editor settings
//! - Observable properties
//! - Message types for the event system

pub mod document;
pub mod messages;
pub mod property;
pub mod settings;

pub use document::{Document, Location};
pub use messages::{IoOutcome, Message};
pub use property::Property;
pub use settings::EditorSettings;
