//! Wire records of the roadway-network snapshot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Node kind within a corridor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RNodeType {
    Station,
    Entrance,
    Exit,
    Intersection,
    Interchange,
    #[serde(other)]
    Unknown,
}

/// One roadway-network node.
///
/// Stations carry a `station_id` and detector list; entrances and exits
/// describe ramp geometry.  Up/down links are node names within the same
/// corridor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RNodeInfo {
    pub name: String,
    pub corridor: String,
    pub n_type: RNodeType,
    /// Station id such as `"S910"`; empty for non-stations.
    #[serde(default)]
    pub station_id: Option<String>,
    /// Cross-street label for ramps.
    #[serde(default)]
    pub label: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub lanes: Option<i32>,
    #[serde(default)]
    pub s_limit: Option<i32>,
    #[serde(default)]
    pub shift: Option<i32>,
    #[serde(default)]
    pub transition: Option<String>,
    #[serde(default)]
    pub up_rnode: Option<String>,
    #[serde(default)]
    pub down_rnode: Option<String>,
    #[serde(default)]
    pub up_station: Option<String>,
    #[serde(default)]
    pub down_station: Option<String>,
    #[serde(default)]
    pub detectors: Vec<String>,
    #[serde(default)]
    pub meters: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Position within the corridor's station ordering, assigned when
    /// the index is built.
    #[serde(default)]
    pub order: Option<usize>,
}

fn default_active() -> bool {
    true
}

impl RNodeInfo {
    pub fn is_station(&self) -> bool {
        self.n_type == RNodeType::Station
    }

    /// Display label used by lists and map tooltips.
    ///
    /// Stations show their station id, ramps their cross street with a
    /// direction letter, everything else the raw node name.
    pub fn display_label(&self) -> String {
        if let Some(station_id) = self.station_id.as_deref() {
            if !station_id.is_empty() {
                return format!("{station_id} ({})", self.name);
            }
        }
        match self.n_type {
            RNodeType::Entrance => {
                format!("{} (E, {})", self.label.as_deref().unwrap_or("-"), self.name)
            }
            RNodeType::Exit => {
                format!("{} (X, {})", self.label.as_deref().unwrap_or("-"), self.name)
            }
            _ => self.name.clone(),
        }
    }
}

/// One directional corridor, e.g. `"I-35W (NB)"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorridorInfo {
    pub name: String,
    /// Roadway designation, e.g. `"I-35W"`.
    pub route: String,
    /// Direction component, e.g. `"NB"`.
    pub dir: String,
    /// All rnode names in travel order.
    #[serde(default)]
    pub rnodes: Vec<String>,
    /// Station rnode names in travel order.
    #[serde(default)]
    pub stations: Vec<String>,
}

/// A loop detector attached to a station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorInfo {
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub rnode_name: Option<String>,
    #[serde(default)]
    pub lane: Option<i32>,
    #[serde(default)]
    pub field: Option<f64>,
    #[serde(default)]
    pub abandoned: bool,
}

/// A ramp meter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeterInfo {
    pub name: String,
    #[serde(default)]
    pub rnode_name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub storage: Option<i32>,
}

/// Configuration stamp attached to a snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfraConfigInfo {
    #[serde(default)]
    pub infra_cfg_date: Option<String>,
}

/// The full roadway-network payload served by the analysis server.
///
/// Also carries the server's endpoint map so deployments can relocate
/// APIs without a client update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfraSnapshot {
    #[serde(default)]
    pub config: InfraConfigInfo,
    #[serde(default)]
    pub corridor_list: Vec<CorridorInfo>,
    #[serde(default)]
    pub rnode_list: HashMap<String, RNodeInfo>,
    #[serde(default)]
    pub detector_list: HashMap<String, DetectorInfo>,
    #[serde(default)]
    pub meter_list: HashMap<String, MeterInfo>,
    #[serde(default)]
    pub api_urls: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_label_shows_station_id() {
        let rnode = RNodeInfo {
            name: "rnd_95".into(),
            corridor: "I-35W (NB)".into(),
            n_type: RNodeType::Station,
            station_id: Some("S910".into()),
            label: None,
            lat: 44.97,
            lon: -93.26,
            lanes: Some(3),
            s_limit: Some(60),
            shift: None,
            transition: None,
            up_rnode: None,
            down_rnode: None,
            up_station: None,
            down_station: None,
            detectors: vec![],
            meters: vec![],
            active: true,
            order: None,
        };
        assert_eq!(rnode.display_label(), "S910 (rnd_95)");
    }

    #[test]
    fn entrance_label_shows_cross_street() {
        let rnode = RNodeInfo {
            name: "rnd_96".into(),
            corridor: "I-35W (NB)".into(),
            n_type: RNodeType::Entrance,
            station_id: None,
            label: Some("46th St".into()),
            lat: 44.92,
            lon: -93.27,
            lanes: None,
            s_limit: None,
            shift: None,
            transition: None,
            up_rnode: None,
            down_rnode: None,
            up_station: None,
            down_station: None,
            detectors: vec![],
            meters: vec![],
            active: true,
            order: None,
        };
        assert_eq!(rnode.display_label(), "46th St (E, rnd_96)");
    }

    #[test]
    fn unknown_node_type_deserializes() {
        let rnode: RNodeInfo = serde_json::from_str(
            r#"{"name":"rnd_1","corridor":"X","n_type":"CD_road","lat":0.0,"lon":0.0}"#,
        )
        .unwrap();
        assert_eq!(rnode.n_type, RNodeType::Unknown);
        assert!(rnode.active);
    }
}
