use std::path::PathBuf;

use tracing::{debug, warn};

use crate::app::Model;
use crate::app::model::{Cell, EditForm, Gesture, ToastLevel, Tool};
use crate::zone::{Direction, ExitEdit, PropEntry, Room, RoomDetails, load_document};

/// A boolean field of the edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomFlag {
    Lockable,
    Locked,
    Solo,
    Temporary,
}

/// All possible events and actions in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Tools
    /// Tab: advance to the next tool
    CycleTool,
    /// Escape: back to the pan tool
    ResetTool,
    /// Pick a tool from the palette
    SelectTool(Tool),

    // Pointer, in grid coordinates
    PointerDown(Cell),
    PointerMove(Cell),
    PointerUp,

    // Edit form
    SetName(String),
    SetDescription(String),
    SetCreator(String),
    SetOwner(String),
    SetFlag(RoomFlag, bool),
    /// Write the form's text and flags onto the room and close the form
    SaveDetails,
    /// Close the form, dropping unsaved text and flags
    CloseForm,
    /// Shift the edited room by whole cells
    NudgeRoom { dx: i32, dy: i32 },
    SaveExit(ExitEdit),
    DeleteExit(Direction),
    SaveProp {
        key: String,
        value: String,
        /// Key the prop had before, when renaming
        replaces: Option<String>,
    },
    DeleteProp(String),

    // Zone inputs
    ZoneInput(String),
    StartingRoomInput(String),

    // Map
    NewMap,
    /// Read a zone document from disk (side effect), then import it
    ImportFile(PathBuf),
    /// Replace every room with the contents of a zone document
    ImportDocument(String),
    Save,
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// All state transitions happen here. File I/O for `Save` and `ImportFile`
/// is done by the app's side-effect handler.
pub fn update(mut model: Model, msg: Message) -> Model {
    if !matches!(msg, Message::Quit) {
        model.quit_confirmed = false;
    }

    match msg {
        // Keyboard tool changes are ignored while the form is open
        Message::CycleTool if !model.form_open() => model.tool = model.tool.next(),
        Message::ResetTool if !model.form_open() => model.tool = Tool::Pan,
        Message::CycleTool | Message::ResetTool => {}
        Message::SelectTool(tool) => model.tool = tool,

        Message::PointerDown(cell) => pointer_down(&mut model, cell),
        Message::PointerMove(cell) => {
            if let Gesture::Drawing(_) = model.gesture {
                model.gesture = Gesture::Drawing(cell);
            }
        }
        Message::PointerUp => pointer_up(&mut model),

        Message::SetName(name) => edit_draft(&mut model, |draft| draft.name = name),
        Message::SetDescription(text) => edit_draft(&mut model, |draft| draft.description = text),
        Message::SetCreator(creator) => edit_draft(&mut model, |draft| draft.creator = creator),
        Message::SetOwner(owner) => edit_draft(&mut model, |draft| draft.owner = owner),
        Message::SetFlag(flag, on) => edit_draft(&mut model, |draft| match flag {
            RoomFlag::Lockable => draft.lockable = on,
            RoomFlag::Locked => draft.locked = on,
            RoomFlag::Solo => draft.solo = on,
            RoomFlag::Temporary => draft.temporary = on,
        }),
        Message::SaveDetails => {
            if let Some(form) = model.form.take() {
                if model.graph.update_details(form.room_index, form.draft) {
                    model.dirty = true;
                    model.show_toast(ToastLevel::Info, "Room saved");
                }
            }
        }
        Message::CloseForm => model.form = None,
        Message::NudgeRoom { dx, dy } => {
            if let Some(index) = form_index(&model) {
                if model.graph.move_room(index, dx, dy) {
                    model.dirty = true;
                }
            }
        }
        Message::SaveExit(edit) => save_exit(&mut model, edit),
        Message::DeleteExit(direction) => {
            if let Some(index) = form_index(&model) {
                if model.graph.delete_exit(index, direction).is_some() {
                    model.dirty = true;
                }
            }
        }
        Message::SaveProp {
            key,
            value,
            replaces,
        } => save_prop(&mut model, &key, &value, replaces.as_deref()),
        Message::DeleteProp(key) => {
            if let Some(index) = form_index(&model) {
                if model.graph.delete_prop(index, &key).is_some() {
                    model.dirty = true;
                }
            }
        }

        Message::ZoneInput(text) => {
            if let Some(zone_id) = model.zone_input.enter(&text) {
                model.graph.renumber_zone(zone_id);
                model.dirty = true;
            } else {
                warn!(input = %text, "rejected zone id");
                model.show_toast(ToastLevel::Error, format!("Invalid zone id: {text}"));
            }
        }
        Message::StartingRoomInput(text) => {
            if let Some(room_id) = model.starting_room_input.enter(&text) {
                model.graph.set_starting_room_id(room_id);
                model.dirty = true;
            } else {
                warn!(input = %text, "rejected starting room id");
                model.show_toast(ToastLevel::Error, format!("Invalid room id: {text}"));
            }
        }

        Message::NewMap => {
            model.graph.clear();
            model.form = None;
            model.gesture = Gesture::Idle;
            model.dirty = true;
            model.show_toast(ToastLevel::Info, "Started a new map");
        }
        Message::ImportDocument(text) => match load_document(&text) {
            Ok(rooms) => {
                let count = rooms.len();
                model.graph.replace_rooms(rooms);
                model.form = None;
                model.gesture = Gesture::Idle;
                model.sync_inputs();
                model.dirty = true;
                model.show_toast(ToastLevel::Info, format!("Imported {count} rooms"));
            }
            Err(err) => {
                warn!(%err, "import rejected");
                model.show_toast(ToastLevel::Error, format!("Error loading file: {err}"));
            }
        },
        // Handled by the side-effect layer
        Message::ImportFile(_) | Message::Save => {}
        Message::Quit => {
            if model.dirty && !model.quit_confirmed {
                model.quit_confirmed = true;
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes. Quit again to discard them",
                );
            } else {
                model.should_quit = true;
            }
        }
    }

    model
}

fn pointer_down(model: &mut Model, cell: Cell) {
    match model.tool {
        Tool::PlaceRoom => model.gesture = Gesture::Drawing(cell),
        Tool::Eraser => {
            if let Some(removed) = model.graph.erase_room_at(cell.x, cell.y) {
                debug!(key = %removed.key(), "erased room");
                model.form = None;
                model.dirty = true;
            }
        }
        Tool::Edit => {
            if let Some(room_index) = model.graph.find_index_at(cell.x, cell.y) {
                let draft = model.graph.rooms()[room_index].details();
                model.form = Some(EditForm { room_index, draft });
            }
        }
        Tool::Pan => model.gesture = Gesture::Panning,
    }
}

fn pointer_up(model: &mut Model) {
    match model.gesture {
        Gesture::Drawing(cell) if model.tool == Tool::PlaceRoom => {
            if model.graph.place_room(cell.x, cell.y).is_some() {
                model.dirty = true;
            }
        }
        _ => {}
    }
    model.gesture = Gesture::Idle;
}

fn form_index(model: &Model) -> Option<usize> {
    model.form.as_ref().map(|form| form.room_index)
}

fn edit_draft(model: &mut Model, apply: impl FnOnce(&mut RoomDetails)) {
    if let Some(form) = model.form.as_mut() {
        apply(&mut form.draft);
    }
}

fn save_exit(model: &mut Model, edit: ExitEdit) {
    let Some(index) = form_index(model) else {
        return;
    };
    let Some(source_key) = model.graph.room(index).map(Room::key) else {
        return;
    };
    if let Some(write) = model.graph.set_exit(index, edit) {
        let overwritten = write
            .backfill
            .and_then(|backfill| backfill.overwritten)
            .filter(|old| *old != source_key);
        if let Some(overwritten) = overwritten {
            model.show_toast(
                ToastLevel::Info,
                format!("Replaced the reverse exit that pointed at {overwritten}"),
            );
        }
        model.dirty = true;
    }
}

fn save_prop(model: &mut Model, key: &str, value: &str, replaces: Option<&str>) {
    let Some(index) = form_index(model) else {
        return;
    };
    let entry = match PropEntry::new(key, value) {
        Ok(entry) => entry,
        Err(err) => {
            warn!(%err, "prop rejected");
            model.show_toast(ToastLevel::Error, err.to_string());
            return;
        }
    };
    let exists = model
        .graph
        .room(index)
        .is_some_and(|room| room.props.contains_key(entry.key()));
    if !exists && replaces.is_none() && !model.graph.can_add_prop(index) {
        model.show_toast(ToastLevel::Warning, "This room already has the most props allowed");
        return;
    }
    if model.graph.set_prop(index, entry, replaces) {
        model.dirty = true;
    }
}
