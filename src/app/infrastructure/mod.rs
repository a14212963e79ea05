//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Error types
//! - Logging and command line
//! - Preferences file
//! - System clipboard
//! - UI thread and worker thread hand-offs

pub mod cli;
pub mod clipboard;
pub mod error;
pub mod io_runner;
pub mod logging;
pub mod preferences;
pub mod ui_queue;
