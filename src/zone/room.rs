use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::direction::Direction;
use super::ids::composite_key;

/// The most exits a room can hold; one per direction.
pub const MAX_EXITS: usize = Direction::ALL.len();

/// The edit form stops offering new props past this count.
pub const MAX_PROPS: usize = 10;

/// A single room of a zone.
///
/// Field names on the wire match the zone documents produced by earlier
/// versions of the editor, so older `.map` files load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Room {
    /// Grid column (authoring geometry only)
    pub grid_x: i32,
    /// Grid row (authoring geometry only)
    pub grid_y: i32,
    /// Footprint in grid squares
    pub grid_size: u32,
    pub room_id: i32,
    pub zone_id: i32,
    pub name: String,
    /// Raw description; may contain markup tags and prop keywords
    pub description: String,
    pub lockable: bool,
    pub locked: bool,
    /// Names allowed into the room while it is locked
    pub whitelist: Vec<String>,
    pub temporary: bool,
    pub creator: String,
    pub owner: String,
    pub solo: bool,
    /// Exit direction to target composite key. Targets may dangle.
    pub exits: BTreeMap<Direction, String>,
    /// Interactable keywords referenced from the description
    pub props: BTreeMap<String, String>,
    #[serde(skip)]
    is_current: bool,
}

impl Default for Room {
    fn default() -> Self {
        Self {
            grid_x: 0,
            grid_y: 0,
            grid_size: 1,
            room_id: 0,
            zone_id: 0,
            name: String::new(),
            description: String::new(),
            lockable: false,
            locked: false,
            whitelist: Vec::new(),
            temporary: false,
            creator: String::new(),
            owner: String::new(),
            solo: false,
            exits: BTreeMap::new(),
            props: BTreeMap::new(),
            is_current: false,
        }
    }
}

impl Room {
    /// Create an empty room at a grid cell with a provisional id.
    pub fn new(grid_x: i32, grid_y: i32, room_id: i32, zone_id: i32) -> Self {
        Self {
            grid_x,
            grid_y,
            room_id,
            zone_id,
            ..Self::default()
        }
    }

    /// The `zone:room` key other rooms' exits point at.
    pub fn key(&self) -> String {
        composite_key(self.zone_id, self.room_id)
    }

    /// Whether the terminal is currently standing in this room.
    pub const fn is_current(&self) -> bool {
        self.is_current
    }

    pub(crate) const fn set_current(&mut self, current: bool) {
        self.is_current = current;
    }

    pub const fn is_at(&self, grid_x: i32, grid_y: i32) -> bool {
        self.grid_x == grid_x && self.grid_y == grid_y
    }

    /// Label drawn on the room tile: `{ name } [001:002]`, or just the key when unnamed.
    pub fn tile_label(&self) -> String {
        if self.name.is_empty() {
            format!("[{}]", self.key())
        } else {
            format!("{{ {} }} [{}]", self.name, self.key())
        }
    }

    /// Label used when picking an exit target: `001:002 (name)`.
    pub fn option_label(&self) -> String {
        if self.name.is_empty() {
            self.key()
        } else {
            format!("{} ({})", self.key(), self.name)
        }
    }

    /// Snapshot of the fields the edit form saves in one go.
    pub fn details(&self) -> RoomDetails {
        RoomDetails {
            name: self.name.clone(),
            description: self.description.clone(),
            lockable: self.lockable,
            locked: self.locked,
            solo: self.solo,
            temporary: self.temporary,
            creator: self.creator.clone(),
            owner: self.owner.clone(),
        }
    }

    pub(crate) fn apply_details(&mut self, details: RoomDetails) {
        self.name = details.name;
        self.description = details.description;
        self.lockable = details.lockable;
        self.locked = details.locked;
        self.solo = details.solo;
        self.temporary = details.temporary;
        self.creator = details.creator;
        self.owner = details.owner;
    }
}

/// Authorable text and flags of a room, saved together from the edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomDetails {
    pub name: String,
    pub description: String,
    pub lockable: bool,
    pub locked: bool,
    pub solo: bool,
    pub temporary: bool,
    pub creator: String,
    pub owner: String,
}

/// Rejected prop input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropError {
    #[error("prop key is empty")]
    EmptyKey,
    #[error("prop key \"{0}\" must be a single word with no spaces")]
    WhitespaceInKey(String),
    #[error("prop \"{0}\" needs a description")]
    EmptyValue(String),
}

/// A prop key/value pair that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropEntry {
    key: String,
    value: String,
}

impl PropEntry {
    /// Validate author input. Both parts are trimmed first.
    pub fn new(key: &str, value: &str) -> Result<Self, PropError> {
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            return Err(PropError::EmptyKey);
        }
        if key.chars().any(char::is_whitespace) {
            return Err(PropError::WhitespaceInKey(key.to_string()));
        }
        if value.is_empty() {
            return Err(PropError::EmptyValue(key.to_string()));
        }
        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn into_parts(self) -> (String, String) {
        (self.key, self.value)
    }
}

/// Truncate `text` to at most `width` terminal columns, ending with `…` when cut.
pub fn fit_label(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width - 1 {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    out
}
