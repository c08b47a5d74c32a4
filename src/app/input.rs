//! Editor command lines to messages.

use std::path::PathBuf;

use thiserror::Error;

use crate::app::model::{Cell, Tool, UnknownTool};
use crate::app::update::{Message, RoomFlag};
use crate::zone::{Direction, ExitEdit, UnknownDirection};

/// A command line that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command \"{0}\" (type help for a list)")]
    UnknownCommand(String),
    #[error("{command} expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("\"{0}\" is not a whole number")]
    NotANumber(String),
    #[error(transparent)]
    Tool(#[from] UnknownTool),
    #[error(transparent)]
    Direction(#[from] UnknownDirection),
    #[error("unknown flag \"{0}\" (expected lockable, locked, solo or temporary)")]
    UnknownFlag(String),
    #[error("expected on or off, got \"{0}\"")]
    NotASwitch(String),
}

/// Read-only views the editor can print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Rooms,
    Links,
    Status,
    /// The open edit form
    Form,
}

/// What one command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Send(Vec<Message>),
    Show(Panel),
    Help,
    Nothing,
}

impl From<Message> for Action {
    fn from(msg: Message) -> Self {
        Self::Send(vec![msg])
    }
}

pub const HELP: &str = "\
Tools:    tab | esc | tool <pan|room|edit|eraser>
Pointer:  down <x> <y> | drag <x> <y> | up | click <x> <y>
Form:     name <text> | desc <text> | creator <text> | owner <text>
          flag <lockable|locked|solo|temporary> <on|off> | nudge <dx> <dy>
          exit <dir> <zone:room> [<old dir>] | unexit <dir>
          prop <key> <text> | reprop <old key> <key> <text> | unprop <key>
          done | cancel
Zone:     zone <id> | start <id> | new | import <file> | save | quit
Views:    rooms | links | status | form | help
";

/// Parse one editor command line.
pub fn parse_line(line: &str) -> Result<Action, InputError> {
    let line = line.trim();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));
    let args: Vec<&str> = rest.split_whitespace().collect();

    let action = match verb.to_lowercase().as_str() {
        "" => Action::Nothing,
        "help" | "?" => Action::Help,
        "rooms" | "ls" => Action::Show(Panel::Rooms),
        "links" => Action::Show(Panel::Links),
        "status" => Action::Show(Panel::Status),
        "form" => Action::Show(Panel::Form),

        "tab" => Message::CycleTool.into(),
        "esc" => Message::ResetTool.into(),
        "tool" => {
            let name = required(&args, 0, "tool", "a tool name")?;
            Message::SelectTool(name.parse()?).into()
        }

        "down" => Message::PointerDown(cell(&args, "down")?).into(),
        "drag" => Message::PointerMove(cell(&args, "drag")?).into(),
        "up" => Message::PointerUp.into(),
        "click" => {
            let at = cell(&args, "click")?;
            Action::Send(vec![Message::PointerDown(at), Message::PointerUp])
        }

        "name" => Message::SetName(rest.to_string()).into(),
        "desc" => Message::SetDescription(rest.to_string()).into(),
        "creator" => Message::SetCreator(rest.to_string()).into(),
        "owner" => Message::SetOwner(rest.to_string()).into(),
        "flag" => {
            let flag = match required(&args, 0, "flag", "a flag name")? {
                "lockable" => RoomFlag::Lockable,
                "locked" => RoomFlag::Locked,
                "solo" => RoomFlag::Solo,
                "temporary" => RoomFlag::Temporary,
                other => return Err(InputError::UnknownFlag(other.to_string())),
            };
            let on = match required(&args, 1, "flag", "on or off")? {
                "on" | "yes" | "true" => true,
                "off" | "no" | "false" => false,
                other => return Err(InputError::NotASwitch(other.to_string())),
            };
            Message::SetFlag(flag, on).into()
        }
        "done" => Message::SaveDetails.into(),
        "cancel" => Message::CloseForm.into(),
        "nudge" => {
            let dx = number(required(&args, 0, "nudge", "<dx> <dy>")?)?;
            let dy = number(required(&args, 1, "nudge", "<dx> <dy>")?)?;
            Message::NudgeRoom { dx, dy }.into()
        }

        "exit" => {
            let direction = direction(required(&args, 0, "exit", "<dir> <zone:room>")?)?;
            let target = required(&args, 1, "exit", "<dir> <zone:room>")?;
            let mut edit = ExitEdit::new(direction, target);
            if let Some(previous) = args.get(2) {
                edit = edit.replacing(self::direction(previous)?);
            }
            Message::SaveExit(edit).into()
        }
        "unexit" => {
            let direction = direction(required(&args, 0, "unexit", "a direction")?)?;
            Message::DeleteExit(direction).into()
        }
        "prop" => {
            let key = required(&args, 0, "prop", "<key> <text>")?;
            Message::SaveProp {
                key: key.to_string(),
                value: text_after(rest, 1),
                replaces: None,
            }
            .into()
        }
        "reprop" => {
            let old = required(&args, 0, "reprop", "<old key> <key> <text>")?;
            let key = required(&args, 1, "reprop", "<old key> <key> <text>")?;
            Message::SaveProp {
                key: key.to_string(),
                value: text_after(rest, 2),
                replaces: Some(old.to_string()),
            }
            .into()
        }
        "unprop" => {
            let key = required(&args, 0, "unprop", "a prop key")?;
            Message::DeleteProp(key.to_string()).into()
        }

        "zone" => Message::ZoneInput(rest.to_string()).into(),
        "start" => Message::StartingRoomInput(rest.to_string()).into(),
        "new" => Message::NewMap.into(),
        "import" => {
            required(&args, 0, "import", "a file path")?;
            Message::ImportFile(PathBuf::from(rest)).into()
        }
        "save" => Message::Save.into(),
        "quit" | "q" => Message::Quit.into(),
        _ => return Err(InputError::UnknownCommand(verb.to_string())),
    };
    Ok(action)
}

fn required<'a>(
    args: &[&'a str],
    index: usize,
    command: &'static str,
    expected: &'static str,
) -> Result<&'a str, InputError> {
    args.get(index)
        .copied()
        .ok_or(InputError::MissingArgument { command, expected })
}

fn number(text: &str) -> Result<i32, InputError> {
    text.parse()
        .map_err(|_| InputError::NotANumber(text.to_string()))
}

fn cell(args: &[&str], command: &'static str) -> Result<Cell, InputError> {
    let x = number(required(args, 0, command, "<x> <y>")?)?;
    let y = number(required(args, 1, command, "<x> <y>")?)?;
    Ok(Cell::new(x, y))
}

fn direction(token: &str) -> Result<Direction, InputError> {
    Direction::from_alias(&token.to_lowercase())
        .ok_or_else(|| UnknownDirection(token.to_string()).into())
}

/// Everything after the first `skip` words, with inner spacing kept.
fn text_after(rest: &str, skip: usize) -> String {
    let mut remaining = rest;
    for _ in 0..skip {
        remaining = remaining
            .trim_start()
            .split_once(char::is_whitespace)
            .map_or("", |(_, tail)| tail);
    }
    remaining.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send(line: &str) -> Vec<Message> {
        match parse_line(line).unwrap() {
            Action::Send(messages) => messages,
            other => panic!("expected messages for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_views_and_blank_lines() {
        assert_eq!(parse_line("   "), Ok(Action::Nothing));
        assert_eq!(parse_line("ls"), Ok(Action::Show(Panel::Rooms)));
        assert_eq!(parse_line("LINKS"), Ok(Action::Show(Panel::Links)));
        assert_eq!(parse_line("help"), Ok(Action::Help));
    }

    #[test]
    fn test_pointer_commands() {
        assert_eq!(
            send("click 3 -4"),
            vec![Message::PointerDown(Cell::new(3, -4)), Message::PointerUp]
        );
        assert_eq!(send("drag 1 1"), vec![Message::PointerMove(Cell::new(1, 1))]);
        assert_eq!(parse_line("down 1"), Err(InputError::MissingArgument {
            command: "down",
            expected: "<x> <y>",
        }));
        assert_eq!(
            parse_line("down a 1"),
            Err(InputError::NotANumber("a".to_string()))
        );
    }

    #[test]
    fn test_tool_commands() {
        assert_eq!(send("tool eraser"), vec![Message::SelectTool(Tool::Eraser)]);
        assert_eq!(send("tab"), vec![Message::CycleTool]);
        assert!(matches!(parse_line("tool brush"), Err(InputError::Tool(_))));
    }

    #[test]
    fn test_text_fields_keep_spacing() {
        assert_eq!(
            send("desc A [i:lamp]  glows <sl>"),
            vec![Message::SetDescription("A [i:lamp]  glows <sl>".to_string())]
        );
        assert_eq!(send("name"), vec![Message::SetName(String::new())]);
    }

    #[test]
    fn test_exit_commands() {
        assert_eq!(
            send("exit n 001:002"),
            vec![Message::SaveExit(ExitEdit::new(Direction::North, "001:002"))]
        );
        assert_eq!(
            send("exit ne 001:002 north"),
            vec![Message::SaveExit(
                ExitEdit::new(Direction::Northeast, "001:002").replacing(Direction::North)
            )]
        );
        assert_eq!(
            parse_line("unexit sideways"),
            Err(InputError::Direction(UnknownDirection("sideways".to_string())))
        );
    }

    #[test]
    fn test_prop_commands() {
        assert_eq!(
            send("prop lamp A brass  lamp."),
            vec![Message::SaveProp {
                key: "lamp".to_string(),
                value: "A brass  lamp.".to_string(),
                replaces: None,
            }]
        );
        assert_eq!(
            send("reprop lamp lantern A tin lantern."),
            vec![Message::SaveProp {
                key: "lantern".to_string(),
                value: "A tin lantern.".to_string(),
                replaces: Some("lamp".to_string()),
            }]
        );
        assert_eq!(
            send("prop lamp"),
            vec![Message::SaveProp {
                key: "lamp".to_string(),
                value: String::new(),
                replaces: None,
            }]
        );
    }

    #[test]
    fn test_flags() {
        assert_eq!(
            send("flag locked on"),
            vec![Message::SetFlag(RoomFlag::Locked, true)]
        );
        assert_eq!(
            parse_line("flag shiny on"),
            Err(InputError::UnknownFlag("shiny".to_string()))
        );
        assert_eq!(
            parse_line("flag solo maybe"),
            Err(InputError::NotASwitch("maybe".to_string()))
        );
    }

    #[test]
    fn test_zone_inputs_pass_raw_text() {
        assert_eq!(send("zone 12"), vec![Message::ZoneInput("12".to_string())]);
        assert_eq!(send("start abc"), vec![Message::StartingRoomInput("abc".to_string())]);
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_line("paint 1 2"),
            Err(InputError::UnknownCommand("paint".to_string()))
        );
    }
}
