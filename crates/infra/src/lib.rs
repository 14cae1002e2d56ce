//! Roadway-network model: corridors, rnodes, detectors and meters, plus
//! the in-memory index the map and route screens query.
//!
//! The network snapshot is fetched from the analysis server as one JSON
//! payload and cached on disk so the client can start offline.

pub mod cache;
pub mod error;
pub mod index;
pub mod types;

pub use error::InfraError;
pub use index::Infra;
pub use types::{CorridorInfo, DetectorInfo, InfraSnapshot, MeterInfo, RNodeInfo, RNodeType};
