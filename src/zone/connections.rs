//! Exit classification for drawing the map.

use std::collections::HashSet;

use super::direction::Direction;
use super::graph::RoomGraph;

/// How an exit relates to the room it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    /// The exit leads back into the room it leaves
    SelfLoop,
    /// The target room has the reverse exit pointing back
    Reciprocal,
    /// The target room has no exit back, or does not exist
    OneWay,
}

/// A single line on the map, derived from one room's exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub source_key: String,
    pub target_key: String,
    pub direction: Direction,
    pub kind: ConnectionKind,
    pub source_index: usize,
    /// `None` when the exit dangles
    pub target_index: Option<usize>,
}

impl Connection {
    pub const fn is_dangling(&self) -> bool {
        self.target_index.is_none()
    }
}

/// Stable key for an unordered pair of rooms.
fn pair_key(a: &str, b: &str) -> String {
    if a < b {
        format!("{a}-{b}")
    } else {
        format!("{b}-{a}")
    }
}

/// Classify every exit in the graph.
///
/// Reciprocal pairs are emitted once per unordered pair of rooms; self-loops
/// and one-way exits are emitted for every occurrence.
pub fn classify(graph: &RoomGraph) -> Vec<Connection> {
    let rooms = graph.rooms();
    let mut drawn_pairs = HashSet::new();
    let mut connections = Vec::new();

    for (source_index, room) in rooms.iter().enumerate() {
        let source_key = room.key();
        for (&direction, target_key) in &room.exits {
            let target_index = graph.find_index_by_key(target_key);
            let kind = if *target_key == source_key {
                ConnectionKind::SelfLoop
            } else if target_index.is_some_and(|index| {
                rooms[index].exits.get(&direction.reverse()) == Some(&source_key)
            }) {
                ConnectionKind::Reciprocal
            } else {
                ConnectionKind::OneWay
            };

            if kind == ConnectionKind::Reciprocal
                && !drawn_pairs.insert(pair_key(&source_key, target_key))
            {
                continue;
            }

            connections.push(Connection {
                source_key: source_key.clone(),
                target_key: target_key.clone(),
                direction,
                kind,
                source_index,
                target_index,
            });
        }
    }
    connections
}
