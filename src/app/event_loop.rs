use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::debug;

use crate::app::input::{Action, HELP, Panel, parse_line};
use crate::app::view::{self, LABEL_WIDTH};
use crate::app::{App, Message, Model, ToastLevel, update};
use crate::zone::RoomGraph;

impl App {
    /// Run a line-oriented editor session until `quit` or end of input.
    ///
    /// Returns the final model so callers can inspect what was built.
    pub fn run_editor<R: BufRead, W: Write>(
        &self,
        graph: RoomGraph,
        input: R,
        out: &mut W,
    ) -> Result<Model> {
        let mut model = Model::new(self.zone_path.clone(), graph);
        writeln!(
            out,
            "Editing {} ({} rooms). Type help for commands.",
            self.zone_path.display(),
            model.graph.len()
        )?;
        write_prompt(out, &model)?;

        for line in input.lines() {
            let line = line.context("Failed to read editor command")?;
            match parse_line(&line) {
                Ok(Action::Send(messages)) => {
                    for msg in messages {
                        model = self.dispatch(model, msg);
                    }
                }
                Ok(Action::Show(panel)) => out.write_all(render_panel(panel, &model).as_bytes())?,
                Ok(Action::Help) => out.write_all(HELP.as_bytes())?,
                Ok(Action::Nothing) => {}
                Err(err) => writeln!(out, "error: {err}")?,
            }
            if let Some((message, level)) = model.take_toast() {
                writeln!(out, "{}{message}", toast_prefix(level))?;
            }
            if model.should_quit {
                break;
            }
            write_prompt(out, &model)?;
        }
        out.flush()?;
        Ok(model)
    }

    /// Update, then run side effects and any follow-up they produce.
    pub(super) fn dispatch(&self, model: Model, msg: Message) -> Model {
        debug!(?msg, "dispatch");
        let mut model = update(model, msg.clone());
        match self.handle_message_side_effects(&mut model, &msg) {
            Some(next) => self.dispatch(model, next),
            None => model,
        }
    }

    /// Walk the zone with the player terminal until `quit` or end of input.
    pub fn run_terminal<R: BufRead, W: Write>(
        &self,
        graph: &mut RoomGraph,
        input: R,
        out: &mut W,
    ) -> Result<()> {
        let interpreter = self.interpreter();
        out.write_all(interpreter.start(graph).as_bytes())?;
        out.flush()?;

        for line in input.lines() {
            let line = line.context("Failed to read terminal command")?;
            let command = line.trim();
            if command.is_empty() {
                continue;
            }
            if command.eq_ignore_ascii_case("quit") {
                break;
            }
            if let Some(text) = interpreter.process(graph, command) {
                out.write_all(text.as_bytes())?;
            }
            out.flush()?;
        }
        Ok(())
    }
}

fn render_panel(panel: Panel, model: &Model) -> String {
    match panel {
        Panel::Rooms => view::room_listing(&model.graph, LABEL_WIDTH),
        Panel::Links => view::link_listing(&model.graph),
        Panel::Status => view::status(model),
        Panel::Form => view::form(model),
    }
}

const fn toast_prefix(level: ToastLevel) -> &'static str {
    match level {
        ToastLevel::Info => "",
        ToastLevel::Warning => "warning: ",
        ToastLevel::Error => "error: ",
    }
}

fn write_prompt<W: Write>(out: &mut W, model: &Model) -> Result<()> {
    match model.editing_room() {
        Some(room) => write!(out, "[{} {}]> ", model.tool, room.key())?,
        None => write!(out, "[{}]> ", model.tool)?,
    }
    out.flush()?;
    Ok(())
}
