//! Zone documents and the packed per-room export bundle.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use super::direction::Direction;
use super::graph::RoomGraph;
use super::ids::{ID_WIDTH, MAX_ID, MIN_ID, zero_pad};
use super::room::Room;

/// A zone document that could not be read.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("malformed zone document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("room {index} has {field} {value}, outside {MIN_ID}..={MAX_ID}")]
    IdOutOfRange {
        index: usize,
        field: &'static str,
        value: i32,
    },
}

/// Room as shipped to the game server: everything except grid placement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PackedRoom<'a> {
    room_id: i32,
    zone_id: i32,
    name: &'a str,
    description: &'a str,
    lockable: bool,
    locked: bool,
    whitelist: &'a [String],
    temporary: bool,
    creator: &'a str,
    owner: &'a str,
    solo: bool,
    exits: &'a BTreeMap<Direction, String>,
    props: &'a BTreeMap<String, String>,
}

impl<'a> From<&'a Room> for PackedRoom<'a> {
    fn from(room: &'a Room) -> Self {
        Self {
            room_id: room.room_id,
            zone_id: room.zone_id,
            name: &room.name,
            description: &room.description,
            lockable: room.lockable,
            locked: room.locked,
            whitelist: &room.whitelist,
            temporary: room.temporary,
            creator: &room.creator,
            owner: &room.owner,
            solo: room.solo,
            exits: &room.exits,
            props: &room.props,
        }
    }
}

/// One file of an export bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    /// `<zone>:<room>.json`
    pub file_name: String,
    pub contents: String,
}

/// Serialize the whole ordered room list.
pub fn save_document(rooms: &[Room]) -> Result<String, TransferError> {
    Ok(serde_json::to_string_pretty(rooms)?)
}

/// Parse a zone document. Nothing is applied until the whole document parses.
///
/// Room and zone ids must lie in `MIN_ID..=MAX_ID`, the range an author can type.
pub fn load_document(text: &str) -> Result<Vec<Room>, TransferError> {
    let rooms: Vec<Room> = serde_json::from_str(text)?;
    for (index, room) in rooms.iter().enumerate() {
        for (field, value) in [("roomId", room.room_id), ("zoneId", room.zone_id)] {
            if !(MIN_ID..=MAX_ID).contains(&value) {
                return Err(TransferError::IdOutOfRange {
                    index,
                    field,
                    value,
                });
            }
        }
    }
    Ok(rooms)
}

/// Name of the single-document export for a zone, e.g. `zone_001.map`.
pub fn zone_document_name(zone_id: i32) -> String {
    format!("zone_{}.map", zero_pad(zone_id, ID_WIDTH))
}

/// Name of the bundle holding a zone's packed rooms, e.g. `001`.
pub fn bundle_name(zone_id: i32) -> String {
    zero_pad(zone_id, ID_WIDTH)
}

/// One packed document per room, named by composite key.
pub fn export_bundle(graph: &RoomGraph) -> Result<Vec<BundleEntry>, TransferError> {
    graph
        .rooms()
        .iter()
        .map(|room| {
            Ok(BundleEntry {
                file_name: format!("{}.json", room.key()),
                contents: serde_json::to_string(&PackedRoom::from(room))?,
            })
        })
        .collect()
}

/// Load a zone file into a fresh registry.
pub fn load_graph(path: &Path) -> Result<RoomGraph> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read zone {}", path.display()))?;
    let rooms = load_document(&text)
        .with_context(|| format!("Failed to parse zone {}", path.display()))?;
    let mut graph = RoomGraph::default();
    graph.replace_rooms(rooms);
    info!(path = %path.display(), rooms = graph.len(), "zone loaded");
    Ok(graph)
}

/// Load a zone file, or start an empty zone when the file does not exist yet.
pub fn load_or_new(path: &Path) -> Result<RoomGraph> {
    if path.exists() {
        load_graph(path)
    } else {
        info!(path = %path.display(), "starting a new zone");
        Ok(RoomGraph::default())
    }
}

/// Write the registry's rooms to a zone file.
pub fn save_graph(graph: &RoomGraph, path: &Path) -> Result<()> {
    let text = save_document(graph.rooms())?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("Failed to write zone {}", path.display()))?;
    info!(path = %path.display(), rooms = graph.len(), "zone saved");
    Ok(())
}

/// Write the packed bundle and the whole-zone document under `out_dir`.
///
/// Packed rooms land in `out_dir/<zone>/`; the zone document in
/// `out_dir/zone_<zone>.map`. Returns the bundle directory.
///
/// Room files are named `<zone>:<room>.json`, which the game server loads by
/// key. Windows rejects `:` in file names, so there this returns the write
/// error for the first room; use [`export_bundle`] to package elsewhere.
pub fn write_bundle(graph: &RoomGraph, out_dir: &Path) -> Result<PathBuf> {
    let bundle_dir = out_dir.join(bundle_name(graph.zone_id()));
    fs::create_dir_all(&bundle_dir)
        .with_context(|| format!("Failed to create bundle {}", bundle_dir.display()))?;
    for entry in export_bundle(graph)? {
        let path = bundle_dir.join(&entry.file_name);
        fs::write(&path, entry.contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    save_graph(graph, &out_dir.join(zone_document_name(graph.zone_id())))?;
    info!(bundle = %bundle_dir.display(), rooms = graph.len(), "bundle written");
    Ok(bundle_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::ExitEdit;
    use tempfile::tempdir;

    fn sample_graph() -> RoomGraph {
        let mut graph = RoomGraph::new(1);
        graph.place_room(3, 4);
        graph.place_room(3, 3);
        graph.set_exit(0, ExitEdit::new(Direction::North, "001:002"));
        graph
    }

    #[test]
    fn test_packed_rooms_drop_grid_fields() {
        let bundle = export_bundle(&sample_graph()).unwrap();
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle[0].file_name, "001:001.json");
        assert_eq!(bundle[1].file_name, "001:002.json");
        let value: serde_json::Value = serde_json::from_str(&bundle[0].contents).unwrap();
        assert!(value.get("gridX").is_none());
        assert!(value.get("gridY").is_none());
        assert!(value.get("gridSize").is_none());
        assert_eq!(value["roomId"], 1);
        assert_eq!(value["exits"]["north"], "001:002");
    }

    #[test]
    fn test_document_keeps_room_order_and_geometry() {
        let graph = sample_graph();
        let text = save_document(graph.rooms()).unwrap();
        let rooms = load_document(&text).unwrap();
        assert_eq!(rooms, graph.rooms());
    }

    #[test]
    fn test_load_document_accepts_legacy_fields() {
        let text = r#"[{"gridX":1,"gridY":2,"gridSize":1,"roomId":5,"zoneId":2,
            "name":"Hall","description":"","lockable":false,"locked":false,
            "whitelist":[],"temporary":false,"creator":"","owner":"","solo":false,
            "exits":{},"props":{},"isCurrent":true}]"#;
        let rooms = load_document(text).unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].key(), "002:005");
        assert!(!rooms[0].is_current());
    }

    #[test]
    fn test_load_document_rejects_garbage() {
        assert!(matches!(
            load_document("{ not json"),
            Err(TransferError::Malformed(_))
        ));
        assert!(load_document(r#"[{"exits":{"sideways":"001:001"}}]"#).is_err());
    }

    #[test]
    fn test_load_document_rejects_ids_outside_author_range() {
        let text = r#"[{"gridX":0,"gridY":0,"roomId":1,"zoneId":1},
            {"gridX":1,"gridY":0,"roomId":2147483647,"zoneId":1}]"#;
        let err = load_document(text).unwrap_err();
        assert!(matches!(
            err,
            TransferError::IdOutOfRange {
                index: 1,
                field: "roomId",
                value: i32::MAX
            }
        ));

        let text = r#"[{"gridX":0,"gridY":0,"roomId":5,"zoneId":-1000}]"#;
        assert!(matches!(
            load_document(text),
            Err(TransferError::IdOutOfRange { field: "zoneId", .. })
        ));
    }

    #[test]
    fn test_names() {
        assert_eq!(zone_document_name(1), "zone_001.map");
        assert_eq!(zone_document_name(-4), "zone_-004.map");
        assert_eq!(bundle_name(12), "012");
    }

    #[test]
    fn test_save_and_load_graph_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zones").join("zone_001.map");
        let graph = sample_graph();
        save_graph(&graph, &path).unwrap();

        let loaded = load_graph(&path).unwrap();
        assert_eq!(loaded.rooms(), graph.rooms());
        assert_eq!(loaded.watermark(), 3);
        assert_eq!(loaded.starting_room_id(), 1);
    }

    #[test]
    fn test_load_or_new_starts_empty() {
        let dir = tempdir().unwrap();
        let graph = load_or_new(&dir.path().join("missing.map")).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    #[cfg_attr(windows, ignore = "room file names contain ':'")]
    fn test_write_bundle_creates_files() {
        let dir = tempdir().unwrap();
        let bundle_dir = write_bundle(&sample_graph(), dir.path()).unwrap();
        assert!(bundle_dir.join("001:001.json").exists());
        assert!(bundle_dir.join("001:002.json").exists());
        assert!(dir.path().join("zone_001.map").exists());
    }
}
