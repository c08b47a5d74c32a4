//! Plain-text views of the editor state.

use std::fmt::Write;

use unicode_width::UnicodeWidthStr;

use crate::app::Model;
use crate::zone::{
    ConnectionKind, MAX_EXITS, MAX_PROPS, RoomGraph, classify, fit_label,
};

/// Column width of the label column in room listings.
pub const LABEL_WIDTH: usize = 32;

/// One line per room: fitted tile label, grid cell and exit count.
pub fn room_listing(graph: &RoomGraph, label_width: usize) -> String {
    if graph.is_empty() {
        return "No rooms.\n".to_string();
    }
    let mut out = String::new();
    for room in graph.rooms() {
        let label = fit_label(&room.tile_label(), label_width);
        let padding = label_width.saturating_sub(label.width());
        let marker = if room.is_current() { "*" } else { " " };
        let _ = writeln!(
            out,
            "{marker} {label}{:padding$}  at ({}, {})  exits {}",
            "",
            room.grid_x,
            room.grid_y,
            room.exits.len()
        );
    }
    out
}

/// One line per classified connection.
pub fn link_listing(graph: &RoomGraph) -> String {
    let connections = classify(graph);
    if connections.is_empty() {
        return "No exits.\n".to_string();
    }
    let mut out = String::new();
    for connection in connections {
        let arrow = match connection.kind {
            ConnectionKind::Reciprocal => "<->",
            ConnectionKind::OneWay => "-->",
            ConnectionKind::SelfLoop => "<@>",
        };
        let dangling = if connection.is_dangling() { "  (no such room)" } else { "" };
        let _ = writeln!(
            out,
            "{} {:<9} {arrow} {}{dangling}",
            connection.source_key, connection.direction, connection.target_key
        );
    }
    out
}

/// Tool, inputs and allocator state.
pub fn status(model: &Model) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "tool: {}", model.tool);
    let _ = writeln!(
        out,
        "zone: {}{}",
        model.zone_input.text(),
        if model.zone_input.is_valid() { "" } else { " (invalid)" }
    );
    let _ = writeln!(
        out,
        "starting room: {}{}",
        model.starting_room_input.text(),
        if model.starting_room_input.is_valid() { "" } else { " (invalid)" }
    );
    let _ = writeln!(
        out,
        "rooms: {}  next id after: {}",
        model.graph.len(),
        model.graph.watermark()
    );
    let _ = writeln!(
        out,
        "file: {}{}",
        model.zone_path.display(),
        if model.dirty { " (modified)" } else { "" }
    );
    if let Some(room) = model.editing_room() {
        let _ = writeln!(out, "editing: {}", room.option_label());
    }
    out
}

/// The open edit form: unsaved fields plus the room's exits and props.
pub fn form(model: &Model) -> String {
    let (Some(form), Some(room)) = (model.form.as_ref(), model.editing_room()) else {
        return "No room is being edited.\n".to_string();
    };
    let draft = &form.draft;
    let mut out = String::new();
    let _ = writeln!(out, "room {}", room.key());
    let _ = writeln!(out, "  name: {}", draft.name);
    let _ = writeln!(out, "  description: {}", draft.description);
    let _ = writeln!(out, "  creator: {}  owner: {}", draft.creator, draft.owner);
    let _ = writeln!(
        out,
        "  lockable: {}  locked: {}  solo: {}  temporary: {}",
        draft.lockable, draft.locked, draft.solo, draft.temporary
    );
    let _ = writeln!(out, "  exits ({}/{MAX_EXITS}):", room.exits.len());
    for (direction, target) in &room.exits {
        let name = model
            .graph
            .find_room_by_key(target)
            .map_or_else(|| target.clone(), |room| room.option_label());
        let _ = writeln!(out, "    {direction} -> {name}");
    }
    let _ = writeln!(out, "  props ({}/{MAX_PROPS}):", room.props.len());
    for (key, value) in &room.props {
        let _ = writeln!(out, "    {key}: {value}");
    }
    if !model.graph.can_add_prop(form.room_index) {
        out.push_str("  (prop limit reached)\n");
    }
    out
}
