//! A simulated player terminal for walking a zone while it is being built.
//!
//! The interpreter keeps no position of its own: the room graph's current
//! room is where the player stands.

use tracing::debug;

use crate::text::{Formatter, Viewer, parse_props};
use crate::zone::{Direction, Room, RoomGraph};

/// Verbs that move the player when followed by a direction.
pub const MOVEMENT_VERBS: &[&str] = &[
    "go", "abate", "amble", "bang", "bolt", "bounce", "bound", "burst", "bust", "cant", "canter",
    "caper", "careen", "cavort", "circle", "clamber", "claw", "cleave", "climb", "coil",
    "collapse", "crawl", "creep", "crouch", "crush", "curve", "dance", "dart", "dash", "descend",
    "dip", "dive", "double", "drop", "edge", "erupt", "escape", "fade", "fall", "fight", "flit",
    "float", "flop", "flounce", "flow", "flutter", "fly", "frisk", "frolic", "gallop", "galumph",
    "glide", "hike", "hobble", "hop", "hopscotch", "hover", "hunch", "hurry", "hurtle", "jog",
    "jump", "kneel", "kowtow", "lean", "leap", "lie", "limp", "list", "loll", "lope", "lounge",
    "lower", "lunge", "lurch", "march", "meander", "parade", "pirouette", "pivot", "plod",
    "plummet", "plunge", "pop", "pounce", "prance", "promenade", "prowl", "pull", "race",
    "ramble", "retreat", "revolve", "rip", "rocket", "roll", "run", "rush", "sag", "sail",
    "saunter", "scamper", "scatter", "scoot", "scurry", "scuttle", "shamble", "shiver", "shoot",
    "shuffle", "sidestep", "sink", "skid", "skip", "skitter", "slide", "slink", "slither", "slog",
    "slouch", "slump", "smash", "snap", "sneak", "snuggle", "soar", "spin", "spiral", "sprawl",
    "spring", "sprint", "squat", "squirm", "stagger", "stalk", "stamp", "stoop", "stomp",
    "straggle", "stride", "stroll", "strut", "stumble", "swagger", "sway", "swerve", "swim",
    "swing", "swoop", "tear", "tilt", "tip", "tiptoe", "toddle", "traipse", "tramp", "tread",
    "trip", "trot", "trudge", "twirl", "twist", "vault", "waddle", "wade", "waft", "walk",
    "wander", "wane", "weave", "wheel", "whip", "whirl", "whisk", "whiz", "wiggle", "wobble",
    "wriggle", "writhe", "zag", "zigzag",
];

/// A parsed line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `look` or `l` on its own
    Look,
    /// `look <thing>`; the argument is lowercased
    Examine(String),
    Go(Direction),
    /// A movement verb followed by something that is not a direction
    InvalidDirection(String),
    /// Anything else, as typed
    Invalid(String),
}

/// Parse one line of player input. Matching is case-insensitive.
pub fn parse_command(line: &str) -> Command {
    let raw = line.trim();
    let lowered = raw.to_lowercase();
    let mut parts = lowered.split_whitespace();
    let verb = parts.next().unwrap_or_default();
    let rest: Vec<&str> = parts.collect();

    if verb == "look" || verb == "l" {
        return if rest.is_empty() {
            Command::Look
        } else {
            Command::Examine(rest.join(" "))
        };
    }
    if let Some(token) = rest.first().filter(|_| MOVEMENT_VERBS.contains(&verb)) {
        return Direction::from_alias(token)
            .map_or_else(|| Command::InvalidDirection((*token).to_string()), Command::Go);
    }
    Direction::from_alias(verb).map_or_else(|| Command::Invalid(raw.to_string()), Command::Go)
}

/// Walks a [`RoomGraph`] and renders what the player sees.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    viewer: Viewer,
    formatter: Formatter,
}

impl Interpreter {
    pub const fn new(viewer: Viewer, formatter: Formatter) -> Self {
        Self { viewer, formatter }
    }

    pub const fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub const fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    fn format(&self, text: &str) -> String {
        self.formatter.format(text, &self.viewer)
    }

    /// Enter the first room of the zone.
    pub fn start(&self, graph: &mut RoomGraph) -> String {
        if graph.is_empty() {
            return self.format("There are no rooms to explore yet.\n");
        }
        self.enter(graph, 0)
    }

    /// Run one line of input and return the text to print.
    ///
    /// Returns `None` when no room is current; nothing is printed then.
    pub fn process(&self, graph: &mut RoomGraph, line: &str) -> Option<String> {
        let current = graph.current_index()?;
        let command = parse_command(line);
        debug!(?command, current, "terminal command");

        let output = match command {
            Command::Look => self.enter(graph, current),
            Command::Examine(thing) => self.examine(graph.room(current)?, &thing),
            Command::Go(direction) => {
                let target = graph
                    .room(current)?
                    .exits
                    .get(&direction)
                    .and_then(|key| graph.find_index_by_key(key));
                match target {
                    Some(index) => self.enter(graph, index),
                    None => self.format(&format!("You can't go {direction}.\n")),
                }
            }
            Command::InvalidDirection(token) => {
                self.format(&format!("Invalid direction: {token}\n"))
            }
            Command::Invalid(raw) => self.format(&format!("Invalid command: {raw}\n")),
        };
        Some(output)
    }

    fn examine(&self, room: &Room, thing: &str) -> String {
        let value = room
            .props
            .iter()
            .find(|(key, value)| key.to_lowercase() == thing && !value.is_empty())
            .map(|(_, value)| value);
        match value {
            Some(value) => self.format(&format!("{value}\n")),
            None => self.format(&format!("You don't see anything special about {thing}.\n")),
        }
    }

    fn enter(&self, graph: &mut RoomGraph, index: usize) -> String {
        graph.set_current(index);
        graph
            .room(index)
            .map(|room| self.render_room(room))
            .unwrap_or_default()
    }

    /// Name header, highlighted description and exit list of a room.
    pub fn render_room(&self, room: &Room) -> String {
        let description = self.format(&parse_props(&room.description, &room.props));
        let header = self.format(&format!(
            "\n<yellow>{{ <cyan>{} <yellow>}}<reset>\n",
            room.name
        ));
        let exits = room
            .exits
            .keys()
            .map(|direction| format!("<yellow>[<cyan>{direction}<yellow>]<reset>"))
            .collect::<Vec<_>>()
            .join(" ");
        let exit_line = self.format(&format!("Exits: {exits}\n\n"));
        format!("{header}{description}\n{exit_line}")
    }
}
