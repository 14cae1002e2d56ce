//! Map adapter: turns roadway-network objects into the markers, tile
//! coordinates and polylines a tile-map widget consumes.
//!
//! Rendering itself is out of process; this crate only produces data.

pub mod marker;
pub mod tile;

pub use marker::{BoundingBox, InfraMarker, MarkerKind, MarkerState, RoutePath};
pub use tile::{osm_tile_url, TileCoord, OSM_TILE_URL};
