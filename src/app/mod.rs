//! Editor state and main command loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete editor state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run_editor`]: Command loop that parses lines into messages

mod effects;
mod event_loop;
mod input;
mod model;
mod update;
pub mod view;

pub use input::{Action, HELP, InputError, Panel, parse_line};
pub use model::{Cell, EditForm, Gesture, IdInput, Model, ToastLevel, Tool, UnknownTool};
pub use update::{Message, RoomFlag, update};

use std::path::PathBuf;

use crate::terminal::Interpreter;
use crate::text::{Formatter, Viewer};

/// Owns the session settings and runs the editor and terminal loops.
#[derive(Debug, Clone)]
pub struct App {
    zone_path: PathBuf,
    autosave: bool,
    viewer: Viewer,
    formatter: Formatter,
}

impl App {
    /// Create a new application for the given zone file.
    pub fn new(zone_path: PathBuf) -> Self {
        Self {
            zone_path,
            autosave: false,
            viewer: Viewer::default(),
            formatter: Formatter::default(),
        }
    }

    /// Save the zone after every change.
    pub const fn with_autosave(mut self, enabled: bool) -> Self {
        self.autosave = enabled;
        self
    }

    /// Set who reads terminal output and what their client supports.
    pub fn with_viewer(mut self, viewer: Viewer) -> Self {
        self.viewer = viewer;
        self
    }

    /// Set the formatter used for terminal output.
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn zone_path(&self) -> &std::path::Path {
        &self.zone_path
    }

    /// A player terminal using this app's viewer and formatter.
    pub fn interpreter(&self) -> Interpreter {
        Interpreter::new(self.viewer.clone(), self.formatter.clone())
    }
}
