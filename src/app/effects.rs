use std::fs;

use tracing::{error, warn};

use crate::app::{App, Message, Model, ToastLevel};
use crate::zone::save_graph;

impl App {
    /// Run the file I/O a message asks for, after `update` has seen it.
    ///
    /// Returns a follow-up message to feed back through `update`.
    pub(super) fn handle_message_side_effects(
        &self,
        model: &mut Model,
        msg: &Message,
    ) -> Option<Message> {
        match msg {
            Message::Save => {
                self.save(model, true);
                None
            }
            Message::ImportFile(path) => match fs::read_to_string(path) {
                Ok(text) => Some(Message::ImportDocument(text)),
                Err(err) => {
                    warn!(path = %path.display(), %err, "import read failed");
                    model.show_toast(
                        ToastLevel::Error,
                        format!("Error loading file {}: {err}", path.display()),
                    );
                    None
                }
            },
            _ => {
                if self.autosave && model.dirty {
                    self.save(model, false);
                }
                None
            }
        }
    }

    fn save(&self, model: &mut Model, announce: bool) {
        match save_graph(&model.graph, &model.zone_path) {
            Ok(()) => {
                model.dirty = false;
                if announce {
                    model.show_toast(
                        ToastLevel::Info,
                        format!("Saved {}", model.zone_path.display()),
                    );
                }
            }
            Err(err) => {
                error!(path = %model.zone_path.display(), "save failed: {err:#}");
                model.show_toast(ToastLevel::Error, format!("Save failed: {err:#}"));
            }
        }
    }
}
