// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. config::ConfigFlags)
    clippy::module_name_repetitions
)]

//! # Zonemap
//!
//! A map editor for text adventure zones.
//!
//! Zonemap lets an author lay rooms out on a grid and wire them together:
//! - Rooms keyed by zero-padded `zone:room` identifiers
//! - Exits with automatic reverse links and one-way/loop detection
//! - Props that highlight matching words in room descriptions
//! - A player terminal that previews the zone with colour markup
//!
//! ## Architecture
//!
//! The editor uses The Elm Architecture (TEA) pattern:
//! - **Model**: Editor state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Text panels for the line-oriented front end
//!
//! ## Modules
//!
//! - [`app`]: Editor state machine and command loops
//! - [`zone`]: Identifiers, rooms, the room registry and persistence
//! - [`text`]: Description markup and prop highlighting
//! - [`terminal`]: The player command interpreter
//! - [`config`]: Saved command-line defaults

pub mod app;
pub mod config;
pub mod terminal;
pub mod text;
pub mod zone;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::terminal::Interpreter;
    pub use crate::text::{Formatter, Viewer};
    pub use crate::zone::{Direction, Room, RoomGraph};
}
