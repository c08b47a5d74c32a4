use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The ten directions an exit can leave a room by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
    Up,
    Down,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction: {0}")]
pub struct UnknownDirection(pub String);

/// Short and long spellings accepted by the terminal, mapped to canonical directions.
const ALIASES: &[(&str, Direction)] = &[
    ("north", Direction::North),
    ("n", Direction::North),
    ("south", Direction::South),
    ("s", Direction::South),
    ("east", Direction::East),
    ("e", Direction::East),
    ("west", Direction::West),
    ("w", Direction::West),
    ("northeast", Direction::Northeast),
    ("ne", Direction::Northeast),
    ("northwest", Direction::Northwest),
    ("nw", Direction::Northwest),
    ("southeast", Direction::Southeast),
    ("se", Direction::Southeast),
    ("southwest", Direction::Southwest),
    ("sw", Direction::Southwest),
    ("up", Direction::Up),
    ("u", Direction::Up),
    ("down", Direction::Down),
    ("d", Direction::Down),
];

impl Direction {
    /// Every direction, in the order the edit form lists them.
    pub const ALL: [Self; 10] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::Up,
        Self::Down,
        Self::Northeast,
        Self::Northwest,
        Self::Southeast,
        Self::Southwest,
    ];

    /// Lowercase name used in documents and terminal output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Up => "up",
            Self::Down => "down",
            Self::Northeast => "northeast",
            Self::Northwest => "northwest",
            Self::Southeast => "southeast",
            Self::Southwest => "southwest",
        }
    }

    /// The direction a reciprocal exit leaves the target room by.
    pub const fn reverse(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Northeast => Self::Southwest,
            Self::Southwest => Self::Northeast,
            Self::Northwest => Self::Southeast,
            Self::Southeast => Self::Northwest,
        }
    }

    /// Resolve a terminal token such as `n` or `northeast`. Case sensitive; callers lowercase first.
    pub fn from_alias(token: &str) -> Option<Self> {
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == token)
            .map(|(_, direction)| *direction)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Direction {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.name() == s)
            .ok_or_else(|| UnknownDirection(s.to_string()))
    }
}
