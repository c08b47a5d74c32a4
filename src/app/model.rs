use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::zone::{ID_WIDTH, Room, RoomDetails, RoomGraph, parse_identifier, zero_pad};

/// The active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Drag the view around
    #[default]
    Pan,
    /// Draw new rooms onto empty cells
    PlaceRoom,
    /// Open the edit form of the room under the pointer
    Edit,
    /// Delete the room under the pointer
    Eraser,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tool \"{0}\" (expected pan, room, edit or eraser)")]
pub struct UnknownTool(pub String);

impl Tool {
    /// Tab order: pan, room, edit, eraser, then back to pan.
    pub const fn next(self) -> Self {
        match self {
            Self::Pan => Self::PlaceRoom,
            Self::PlaceRoom => Self::Edit,
            Self::Edit => Self::Eraser,
            Self::Eraser => Self::Pan,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Pan => "pan",
            Self::PlaceRoom => "room",
            Self::Edit => "edit",
            Self::Eraser => "eraser",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pan" => Ok(Self::Pan),
            "room" => Ok(Self::PlaceRoom),
            "edit" => Ok(Self::Edit),
            "eraser" => Ok(Self::Eraser),
            other => Err(UnknownTool(other.to_string())),
        }
    }
}

/// A grid cell, in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// What a held pointer button is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Panning,
    /// A room preview follows the pointer until release
    Drawing(Cell),
}

/// Text of an identifier input field and whether it passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdInput {
    text: String,
    valid: bool,
}

impl IdInput {
    /// A valid input showing `value` zero-padded.
    pub fn from_value(value: i32) -> Self {
        Self {
            text: zero_pad(value, ID_WIDTH),
            valid: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Take new author input. Valid input is normalized to the padded form.
    pub(super) fn enter(&mut self, text: &str) -> Option<i32> {
        match parse_identifier(text) {
            Ok(value) => {
                *self = Self::from_value(value);
                Some(value)
            }
            Err(_) => {
                self.text = text.to_string();
                self.valid = false;
                None
            }
        }
    }
}

/// The edit form: a room being edited and its unsaved text and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub room_index: usize,
    pub draft: RoomDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Toast {
    level: ToastLevel,
    message: String,
}

/// The complete editor state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug, Clone)]
pub struct Model {
    /// Every room of the zone
    pub graph: RoomGraph,
    /// Zone file the session reads and writes
    pub zone_path: PathBuf,
    pub tool: Tool,
    pub gesture: Gesture,
    /// Open edit form, if any
    pub form: Option<EditForm>,
    pub zone_input: IdInput,
    pub starting_room_input: IdInput,
    /// Whether the zone changed since it was last saved
    pub dirty: bool,
    toast: Option<Toast>,
    /// Set after a quit attempt with unsaved changes; a second quit proceeds
    pub quit_confirmed: bool,
    /// Whether the session should end
    pub should_quit: bool,
}

impl Model {
    pub fn new(zone_path: PathBuf, graph: RoomGraph) -> Self {
        let zone_input = IdInput::from_value(graph.zone_id());
        let starting_room_input = IdInput::from_value(graph.starting_room_id());
        Self {
            graph,
            zone_path,
            tool: Tool::default(),
            gesture: Gesture::default(),
            form: None,
            zone_input,
            starting_room_input,
            dirty: false,
            toast: None,
            quit_confirmed: false,
            should_quit: false,
        }
    }

    pub const fn form_open(&self) -> bool {
        self.form.is_some()
    }

    /// The room whose edit form is open.
    pub fn editing_room(&self) -> Option<&Room> {
        self.form
            .as_ref()
            .and_then(|form| self.graph.room(form.room_index))
    }

    /// Reset both identifier inputs from the registry.
    pub(super) fn sync_inputs(&mut self) {
        self.zone_input = IdInput::from_value(self.graph.zone_id());
        self.starting_room_input = IdInput::from_value(self.graph.starting_room_id());
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
        });
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Remove the pending toast so it is shown once.
    pub fn take_toast(&mut self) -> Option<(String, ToastLevel)> {
        self.toast.take().map(|toast| (toast.message, toast.level))
    }
}
