//! Zone data: identifiers, rooms, the room registry and its exit graph.
//!
//! [`RoomGraph`] owns every room of the zone being authored. Everything else
//! in this module is either a value it stores ([`Room`], [`Direction`]), a
//! codec it relies on ([`composite_key`], [`parse_identifier`]), or a read-only
//! view computed from it ([`classify`], [`export_bundle`]).

mod connections;
mod direction;
mod graph;
mod ids;
mod room;
mod transfer;

pub use connections::{Connection, ConnectionKind, classify};
pub use direction::{Direction, UnknownDirection};
pub use graph::{
    Backfill, DEFAULT_STARTING_ROOM_ID, DEFAULT_ZONE_ID, ExitEdit, ExitWrite, RoomGraph,
};
pub use ids::{ID_WIDTH, IdError, MAX_ID, MIN_ID, composite_key, parse_identifier, split_key, zero_pad};
pub use room::{MAX_EXITS, MAX_PROPS, PropEntry, PropError, Room, RoomDetails, fit_label};
pub use transfer::{
    BundleEntry, TransferError, bundle_name, export_bundle, load_document, load_graph,
    load_or_new, save_document, save_graph, write_bundle, zone_document_name,
};
