//! The room registry: the single owner of a zone's rooms.

use std::collections::HashSet;

use tracing::debug;

use super::direction::Direction;
use super::ids::{ID_WIDTH, split_key, zero_pad};
use super::room::{MAX_EXITS, MAX_PROPS, PropEntry, Room, RoomDetails};

/// Zone new registries start in.
pub const DEFAULT_ZONE_ID: i32 = 1;

/// Default floor for room id allocation.
pub const DEFAULT_STARTING_ROOM_ID: i32 = 1;

/// A request to point one of a room's exits at a target key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitEdit {
    pub direction: Direction,
    pub target: String,
    /// Direction the exit had before this edit, when the author renamed it
    pub replaces: Option<Direction>,
}

impl ExitEdit {
    pub fn new(direction: Direction, target: impl Into<String>) -> Self {
        Self {
            direction,
            target: target.into(),
            replaces: None,
        }
    }

    /// Mark this edit as renaming an existing exit that used `previous`.
    #[must_use]
    pub fn replacing(mut self, previous: Direction) -> Self {
        self.replaces = Some(previous);
        self
    }
}

/// What `RoomGraph::set_exit` changed, step by step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitWrite {
    /// Exit removed because the edit renamed its direction
    pub removed: Option<(Direction, String)>,
    /// Target the forward direction pointed at before the write
    pub previous: Option<String>,
    /// Reverse exit written on the target room, if the target exists
    pub backfill: Option<Backfill>,
}

/// The reverse half of an exit written onto the target room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backfill {
    pub target_index: usize,
    pub direction: Direction,
    /// Value the target's reverse slot held before being overwritten
    pub overwritten: Option<String>,
}

/// Owns every room of the zone being authored and keeps the exit graph and
/// id allocator consistent.
///
/// Rooms are addressed by their position in collection order. Callers get
/// shared references only; all mutation goes through the methods here.
#[derive(Debug, Clone)]
pub struct RoomGraph {
    rooms: Vec<Room>,
    zone_id: i32,
    /// Floor for id allocation
    starting_room_id: i32,
    /// High-water mark for id allocation; never decreases
    current_room_id: i32,
}

impl Default for RoomGraph {
    fn default() -> Self {
        Self::new(DEFAULT_ZONE_ID)
    }
}

impl RoomGraph {
    /// Create an empty registry for `zone_id`.
    pub const fn new(zone_id: i32) -> Self {
        Self {
            rooms: Vec::new(),
            zone_id,
            starting_room_id: DEFAULT_STARTING_ROOM_ID,
            current_room_id: DEFAULT_STARTING_ROOM_ID,
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, index: usize) -> Option<&Room> {
        self.rooms.get(index)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub const fn zone_id(&self) -> i32 {
        self.zone_id
    }

    pub const fn starting_room_id(&self) -> i32 {
        self.starting_room_id
    }

    /// The allocator's high-water mark.
    pub const fn watermark(&self) -> i32 {
        self.current_room_id
    }

    /// Set the lowest id the allocator hands out.
    pub fn set_starting_room_id(&mut self, starting_room_id: i32) {
        debug!(starting_room_id, "room id floor changed");
        self.starting_room_id = starting_room_id;
    }

    /// First unused id between the floor and the watermark, else a new watermark.
    fn allocate_room_id(&mut self) -> i32 {
        let used: HashSet<i32> = self.rooms.iter().map(|room| room.room_id).collect();
        if let Some(free) =
            (self.starting_room_id..=self.current_room_id).find(|id| !used.contains(id))
        {
            return free;
        }
        loop {
            let next = self
                .current_room_id
                .saturating_add(1)
                .max(self.starting_room_id);
            let exhausted = next == self.current_room_id;
            self.current_room_id = next;
            if exhausted || !used.contains(&next) {
                return next;
            }
        }
    }

    /// Assign `candidate` a fresh id, append it and return the stored room.
    pub fn add_room(&mut self, mut candidate: Room) -> &Room {
        candidate.room_id = self.allocate_room_id();
        candidate.set_current(false);
        debug!(
            room_id = candidate.room_id,
            grid_x = candidate.grid_x,
            grid_y = candidate.grid_y,
            "room added"
        );
        self.rooms.push(candidate);
        &self.rooms[self.rooms.len() - 1]
    }

    /// Create a room in this zone at an empty cell. Returns `None` when the cell is taken.
    pub fn place_room(&mut self, grid_x: i32, grid_y: i32) -> Option<&Room> {
        if self.find_index_at(grid_x, grid_y).is_some() {
            return None;
        }
        let candidate = Room::new(grid_x, grid_y, 0, self.zone_id);
        Some(self.add_room(candidate))
    }

    /// Delete the room at `index`, first removing every exit that targets it.
    pub fn remove_room_at(&mut self, index: usize) -> Option<Room> {
        let key = self.rooms.get(index)?.key();
        let mut scrubbed = 0;
        for (i, room) in self.rooms.iter_mut().enumerate() {
            if i == index {
                continue;
            }
            let before = room.exits.len();
            room.exits.retain(|_, target| *target != key);
            scrubbed += before - room.exits.len();
        }
        debug!(%key, scrubbed, "room removed");
        Some(self.rooms.remove(index))
    }

    /// Remove whichever room occupies a grid cell.
    pub fn erase_room_at(&mut self, grid_x: i32, grid_y: i32) -> Option<Room> {
        let index = self.find_index_at(grid_x, grid_y)?;
        self.remove_room_at(index)
    }

    pub fn find_index_at(&self, grid_x: i32, grid_y: i32) -> Option<usize> {
        self.rooms.iter().position(|room| room.is_at(grid_x, grid_y))
    }

    /// First room, in collection order, placed at the cell.
    pub fn find_room_at(&self, grid_x: i32, grid_y: i32) -> Option<&Room> {
        self.find_index_at(grid_x, grid_y).map(|index| &self.rooms[index])
    }

    pub fn find_index_by_key(&self, key: &str) -> Option<usize> {
        self.rooms.iter().position(|room| room.key() == key)
    }

    /// First room whose composite key equals `key`.
    pub fn find_room_by_key(&self, key: &str) -> Option<&Room> {
        self.find_index_by_key(key).map(|index| &self.rooms[index])
    }

    /// Write an exit and backfill the reverse exit on the target room.
    ///
    /// Runs three steps in order: drop the renamed direction, set the forward
    /// exit, then, if the target key names a room, overwrite that room's exit
    /// in the reverse direction so it points back here. Returns `None` when
    /// `index` is out of range.
    pub fn set_exit(&mut self, index: usize, edit: ExitEdit) -> Option<ExitWrite> {
        let source_key = self.rooms.get(index)?.key();
        let ExitEdit {
            direction,
            target,
            replaces,
        } = edit;

        let room = &mut self.rooms[index];
        let removed = replaces
            .filter(|previous| *previous != direction)
            .and_then(|previous| room.exits.remove(&previous).map(|old| (previous, old)));
        let previous = room.exits.insert(direction, target.clone());

        let backfill = self.find_index_by_key(&target).map(|target_index| {
            let reverse = direction.reverse();
            let overwritten = self.rooms[target_index]
                .exits
                .insert(reverse, source_key.clone());
            Backfill {
                target_index,
                direction: reverse,
                overwritten,
            }
        });

        debug!(
            source = %source_key,
            %direction,
            %target,
            backfilled = backfill.is_some(),
            "exit set"
        );
        Some(ExitWrite {
            removed,
            previous,
            backfill,
        })
    }

    /// Remove a room's exit. The target's reverse exit, if any, is left alone.
    pub fn delete_exit(&mut self, index: usize, direction: Direction) -> Option<String> {
        let removed = self.rooms.get_mut(index)?.exits.remove(&direction);
        debug!(index, %direction, removed = removed.is_some(), "exit deleted");
        removed
    }

    /// Move every room into `zone_id` and rewrite the zone segment of every exit target.
    ///
    /// Targets that are not `zone:room` shaped are left as they are.
    pub fn renumber_zone(&mut self, zone_id: i32) {
        let prefix = zero_pad(zone_id, ID_WIDTH);
        for room in &mut self.rooms {
            room.zone_id = zone_id;
            for target in room.exits.values_mut() {
                let rewritten = split_key(target).map(|(_, room_seg)| format!("{prefix}:{room_seg}"));
                if let Some(rewritten) = rewritten {
                    *target = rewritten;
                }
            }
        }
        self.zone_id = zone_id;
        debug!(zone_id, rooms = self.rooms.len(), "zone renumbered");
    }

    /// Save the edit form's text and flags onto a room.
    pub fn update_details(&mut self, index: usize, details: RoomDetails) -> bool {
        let Some(room) = self.rooms.get_mut(index) else {
            return false;
        };
        room.apply_details(details);
        true
    }

    /// Shift a room by whole grid cells. Overlapping another room is allowed.
    pub fn move_room(&mut self, index: usize, dx: i32, dy: i32) -> bool {
        let Some(room) = self.rooms.get_mut(index) else {
            return false;
        };
        room.grid_x += dx;
        room.grid_y += dy;
        true
    }

    /// Add or edit a prop. `replaces` names the key being renamed, if any.
    pub fn set_prop(&mut self, index: usize, entry: PropEntry, replaces: Option<&str>) -> bool {
        let Some(room) = self.rooms.get_mut(index) else {
            return false;
        };
        if let Some(old_key) = replaces {
            room.props.remove(old_key);
        }
        let (key, value) = entry.into_parts();
        room.props.insert(key, value);
        true
    }

    pub fn delete_prop(&mut self, index: usize, key: &str) -> Option<String> {
        self.rooms.get_mut(index)?.props.remove(key)
    }

    /// Whether the edit form should still offer a new exit.
    pub fn can_add_exit(&self, index: usize) -> bool {
        self.rooms
            .get(index)
            .is_some_and(|room| room.exits.len() < MAX_EXITS)
    }

    /// Whether the edit form should still offer a new prop.
    pub fn can_add_prop(&self, index: usize) -> bool {
        self.rooms
            .get(index)
            .is_some_and(|room| room.props.len() < MAX_PROPS)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.rooms.iter().position(Room::is_current)
    }

    /// The room the terminal is standing in.
    pub fn current_room(&self) -> Option<&Room> {
        self.rooms.iter().find(|room| room.is_current())
    }

    /// Move the current-room marker. Clears it everywhere else.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index >= self.rooms.len() {
            return false;
        }
        for (i, room) in self.rooms.iter_mut().enumerate() {
            room.set_current(i == index);
        }
        true
    }

    /// Replace the whole collection with imported rooms.
    ///
    /// The allocator floor becomes the lowest imported id and the watermark one
    /// past the highest, so new rooms never collide with imported ones. The
    /// zone follows the first imported room.
    pub fn replace_rooms(&mut self, mut rooms: Vec<Room>) {
        for room in &mut rooms {
            room.set_current(false);
        }
        let lowest = rooms.iter().map(|room| room.room_id).min();
        let highest = rooms.iter().map(|room| room.room_id).max();
        match (lowest, highest) {
            (Some(lowest), Some(highest)) => {
                self.starting_room_id = lowest;
                self.current_room_id = highest.saturating_add(1);
            }
            _ => {
                self.starting_room_id = DEFAULT_STARTING_ROOM_ID;
                self.current_room_id = DEFAULT_STARTING_ROOM_ID;
            }
        }
        if let Some(first) = rooms.first() {
            self.zone_id = first.zone_id;
        }
        debug!(
            rooms = rooms.len(),
            floor = self.starting_room_id,
            watermark = self.current_room_id,
            "rooms replaced"
        );
        self.rooms = rooms;
    }

    /// Drop every room. The allocator keeps its watermark.
    pub fn clear(&mut self) {
        self.rooms.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::composite_key;

    fn graph_with_rooms(count: i32) -> RoomGraph {
        let mut graph = RoomGraph::new(1);
        for i in 0..count {
            graph.place_room(i, 0);
        }
        graph
    }

    #[test]
    fn test_add_room_overwrites_candidate_id() {
        let mut graph = RoomGraph::new(1);
        let room = graph.add_room(Room::new(0, 0, 500, 1));
        assert_eq!(room.room_id, 1);
    }

    #[test]
    fn test_allocation_is_sequential_without_deletions() {
        let graph = graph_with_rooms(4);
        let ids: Vec<i32> = graph.rooms().iter().map(|r| r.room_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(graph.watermark(), 4);
    }

    #[test]
    fn test_freed_id_is_reused_before_watermark_advances() {
        let mut graph = graph_with_rooms(3);
        graph.remove_room_at(0);
        let reused = graph.place_room(10, 10).unwrap().room_id;
        assert_eq!(reused, 1);
        assert_eq!(graph.watermark(), 3);
        let fresh = graph.place_room(11, 10).unwrap().room_id;
        assert_eq!(fresh, 4);
    }

    #[test]
    fn test_watermark_never_retreats() {
        let mut graph = graph_with_rooms(3);
        graph.remove_room_at(2);
        graph.remove_room_at(1);
        assert_eq!(graph.watermark(), 3);
        assert_eq!(graph.place_room(5, 5).unwrap().room_id, 2);
    }

    #[test]
    fn test_allocation_respects_raised_floor() {
        let mut graph = graph_with_rooms(2);
        graph.set_starting_room_id(50);
        assert_eq!(graph.place_room(9, 9).unwrap().room_id, 50);
        assert_eq!(graph.place_room(9, 8).unwrap().room_id, 51);
    }

    #[test]
    fn test_place_room_rejects_occupied_cell() {
        let mut graph = graph_with_rooms(1);
        assert!(graph.place_room(0, 0).is_none());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_find_room_at_and_by_key() {
        let graph = graph_with_rooms(3);
        assert_eq!(graph.find_room_at(2, 0).map(|r| r.room_id), Some(3));
        assert!(graph.find_room_at(2, 1).is_none());
        assert_eq!(graph.find_room_by_key("001:002").map(|r| r.grid_x), Some(1));
        assert!(graph.find_room_by_key("002:002").is_none());
    }

    #[test]
    fn test_set_exit_backfills_reverse() {
        let mut graph = graph_with_rooms(2);
        let write = graph
            .set_exit(0, ExitEdit::new(Direction::North, "001:002"))
            .unwrap();
        assert_eq!(
            write.backfill,
            Some(Backfill {
                target_index: 1,
                direction: Direction::South,
                overwritten: None,
            })
        );
        assert_eq!(
            graph.rooms()[1].exits.get(&Direction::South).map(String::as_str),
            Some("001:001")
        );
    }

    #[test]
    fn test_set_exit_overwrites_target_reverse_slot() {
        let mut graph = graph_with_rooms(3);
        graph.set_exit(2, ExitEdit::new(Direction::North, "001:002"));
        let write = graph
            .set_exit(0, ExitEdit::new(Direction::North, "001:002"))
            .unwrap();
        let backfill = write.backfill.unwrap();
        assert_eq!(backfill.overwritten.as_deref(), Some("001:003"));
        assert_eq!(
            graph.rooms()[1].exits.get(&Direction::South).map(String::as_str),
            Some("001:001")
        );
        // Room 3 still points north at room 2; it just lost the reciprocal.
        assert_eq!(
            graph.rooms()[2].exits.get(&Direction::North).map(String::as_str),
            Some("001:002")
        );
    }

    #[test]
    fn test_set_exit_rename_removes_old_direction() {
        let mut graph = graph_with_rooms(2);
        graph.set_exit(0, ExitEdit::new(Direction::North, "001:002"));
        let write = graph
            .set_exit(
                0,
                ExitEdit::new(Direction::East, "001:002").replacing(Direction::North),
            )
            .unwrap();
        assert_eq!(write.removed, Some((Direction::North, "001:002".to_string())));
        let exits = &graph.rooms()[0].exits;
        assert!(!exits.contains_key(&Direction::North));
        assert_eq!(exits.get(&Direction::East).map(String::as_str), Some("001:002"));
    }

    #[test]
    fn test_set_exit_to_missing_room_dangles_without_backfill() {
        let mut graph = graph_with_rooms(1);
        let write = graph
            .set_exit(0, ExitEdit::new(Direction::Down, "009:009"))
            .unwrap();
        assert!(write.backfill.is_none());
        assert_eq!(graph.rooms()[0].exits.len(), 1);
    }

    #[test]
    fn test_set_exit_out_of_range_is_noop() {
        let mut graph = graph_with_rooms(1);
        assert!(graph.set_exit(4, ExitEdit::new(Direction::Up, "001:001")).is_none());
    }

    #[test]
    fn test_delete_exit_leaves_reverse_entry() {
        let mut graph = graph_with_rooms(2);
        graph.set_exit(0, ExitEdit::new(Direction::West, "001:002"));
        assert_eq!(graph.delete_exit(0, Direction::West).as_deref(), Some("001:002"));
        assert!(graph.rooms()[0].exits.is_empty());
        assert_eq!(
            graph.rooms()[1].exits.get(&Direction::East).map(String::as_str),
            Some("001:001")
        );
    }

    #[test]
    fn test_remove_room_scrubs_exits_by_real_key() {
        let mut graph = RoomGraph::new(4);
        graph.place_room(0, 0);
        graph.place_room(1, 0);
        graph.set_exit(0, ExitEdit::new(Direction::East, composite_key(4, 2)));
        graph.set_exit(0, ExitEdit::new(Direction::Up, "004:099"));

        let removed = graph.remove_room_at(1).unwrap();
        assert_eq!(removed.key(), "004:002");
        let exits = &graph.rooms()[0].exits;
        assert!(!exits.contains_key(&Direction::East));
        assert!(exits.contains_key(&Direction::Up));
    }

    #[test]
    fn test_remove_room_out_of_range() {
        let mut graph = graph_with_rooms(1);
        assert!(graph.remove_room_at(3).is_none());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_erase_room_at_cell() {
        let mut graph = graph_with_rooms(2);
        assert_eq!(graph.erase_room_at(1, 0).map(|r| r.room_id), Some(2));
        assert!(graph.erase_room_at(1, 0).is_none());
    }

    #[test]
    fn test_renumber_rewrites_zone_segments_only() {
        let mut graph = graph_with_rooms(2);
        graph.set_exit(0, ExitEdit::new(Direction::North, "001:002"));
        graph.set_exit(0, ExitEdit::new(Direction::Up, "007:042"));
        graph.set_exit(1, ExitEdit::new(Direction::Down, "cellar"));

        graph.renumber_zone(-5);

        assert_eq!(graph.zone_id(), -5);
        assert!(graph.rooms().iter().all(|r| r.zone_id == -5));
        let first = &graph.rooms()[0].exits;
        assert_eq!(first.get(&Direction::North).map(String::as_str), Some("-005:002"));
        assert_eq!(first.get(&Direction::Up).map(String::as_str), Some("-005:042"));
        let second = &graph.rooms()[1].exits;
        assert_eq!(second.get(&Direction::South).map(String::as_str), Some("-005:001"));
        assert_eq!(second.get(&Direction::Down).map(String::as_str), Some("cellar"));
    }

    #[test]
    fn test_renumber_keeps_reciprocal_pairs_resolvable() {
        let mut graph = graph_with_rooms(2);
        graph.set_exit(0, ExitEdit::new(Direction::North, "001:002"));
        graph.renumber_zone(3);
        assert_eq!(graph.find_index_by_key("003:002"), Some(1));
    }

    #[test]
    fn test_props_set_rename_delete() {
        let mut graph = graph_with_rooms(1);
        let lamp = PropEntry::new("lamp", "a brass lamp").unwrap();
        assert!(graph.set_prop(0, lamp, None));
        let lantern = PropEntry::new("lantern", "a tin lantern").unwrap();
        assert!(graph.set_prop(0, lantern, Some("lamp")));
        let props = &graph.rooms()[0].props;
        assert!(!props.contains_key("lamp"));
        assert_eq!(props.get("lantern").map(String::as_str), Some("a tin lantern"));
        assert_eq!(graph.delete_prop(0, "lantern").as_deref(), Some("a tin lantern"));
    }

    #[test]
    fn test_exit_cap_gates_form() {
        let mut graph = graph_with_rooms(1);
        for direction in Direction::ALL {
            assert!(graph.can_add_exit(0));
            graph.set_exit(0, ExitEdit::new(direction, "002:001"));
        }
        assert!(!graph.can_add_exit(0));
        assert!(!graph.can_add_exit(9));
    }

    #[test]
    fn test_set_current_keeps_single_marker() {
        let mut graph = graph_with_rooms(3);
        assert!(graph.set_current(0));
        assert!(graph.set_current(2));
        assert_eq!(graph.current_index(), Some(2));
        assert_eq!(graph.rooms().iter().filter(|r| r.is_current()).count(), 1);
        assert!(!graph.set_current(7));
        assert_eq!(graph.current_index(), Some(2));
    }

    #[test]
    fn test_replace_rooms_recomputes_allocator() {
        let mut graph = RoomGraph::new(1);
        graph.replace_rooms(vec![
            Room::new(0, 0, 10, 7),
            Room::new(1, 0, 12, 7),
            Room::new(2, 0, 15, 7),
        ]);
        assert_eq!(graph.starting_room_id(), 10);
        assert_eq!(graph.watermark(), 16);
        assert_eq!(graph.zone_id(), 7);
        // 11 is free between the floor and the watermark.
        assert_eq!(graph.place_room(3, 0).unwrap().room_id, 11);
        assert_eq!(graph.place_room(4, 0).unwrap().room_id, 13);
    }

    #[test]
    fn test_allocator_saturates_at_largest_id() {
        let mut graph = RoomGraph::new(1);
        graph.replace_rooms(vec![Room::new(0, 0, i32::MAX, 1)]);
        assert_eq!(graph.watermark(), i32::MAX);
        assert!(graph.place_room(1, 0).is_some());
        assert_eq!(graph.watermark(), i32::MAX);
    }

    #[test]
    fn test_clear_keeps_watermark() {
        let mut graph = graph_with_rooms(3);
        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.watermark(), 3);
        assert_eq!(graph.place_room(0, 0).unwrap().room_id, 1);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn allocated_ids_are_distinct_and_above_floor(
                floor in -50..50i32,
                count in 1..40usize,
            ) {
                let mut graph = RoomGraph::new(1);
                graph.set_starting_room_id(floor);
                for i in 0..count {
                    graph.place_room(i32::try_from(i).unwrap(), 0);
                }
                let ids: HashSet<i32> = graph.rooms().iter().map(|r| r.room_id).collect();
                prop_assert_eq!(ids.len(), count);
                prop_assert!(ids.iter().all(|id| *id >= floor));
            }

            #[test]
            fn deleting_lowest_then_adding_reuses_it(count in 2..30usize) {
                let mut graph = RoomGraph::new(1);
                for i in 0..count {
                    graph.place_room(i32::try_from(i).unwrap(), 0);
                }
                let watermark = graph.watermark();
                let lowest = graph
                    .rooms()
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, r)| r.room_id)
                    .map(|(i, r)| (i, r.room_id))
                    .unwrap();
                graph.remove_room_at(lowest.0);
                let reused = graph.place_room(-1, -1).unwrap().room_id;
                prop_assert_eq!(reused, lowest.1);
                prop_assert_eq!(graph.watermark(), watermark);
            }
        }
    }
}
