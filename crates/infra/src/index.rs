//! In-memory index over a roadway-network snapshot.

use std::collections::HashMap;

use tetres_core::route::Route;

use crate::error::InfraError;
use crate::types::{CorridorInfo, DetectorInfo, InfraSnapshot, MeterInfo, RNodeInfo};

/// The loaded roadway network.
///
/// Built once from an [`InfraSnapshot`]; lookups are by name, with a
/// secondary station-id index because screens and routes reference
/// stations both ways.  Station order within each corridor is assigned
/// at build time.
pub struct Infra {
    corridors: Vec<CorridorInfo>,
    rnodes: HashMap<String, RNodeInfo>,
    detectors: HashMap<String, DetectorInfo>,
    meters: HashMap<String, MeterInfo>,
    station_index: HashMap<String, String>,
    config_stamp: Option<String>,
    api_urls: HashMap<String, String>,
}

impl Infra {
    /// Build the index from a snapshot.
    pub fn build(snapshot: InfraSnapshot) -> Self {
        let mut rnodes = snapshot.rnode_list;

        // Assign each station its position within its corridor.
        for corridor in &snapshot.corridor_list {
            for (idx, station_name) in corridor.stations.iter().enumerate() {
                if let Some(rnode) = rnodes.get_mut(station_name) {
                    rnode.order = Some(idx);
                }
            }
        }

        let station_index = rnodes
            .values()
            .filter_map(|rn| {
                rn.station_id
                    .as_deref()
                    .filter(|sid| !sid.is_empty())
                    .map(|sid| (sid.to_string(), rn.name.clone()))
            })
            .collect();

        tracing::info!(
            corridors = snapshot.corridor_list.len(),
            rnodes = rnodes.len(),
            detectors = snapshot.detector_list.len(),
            meters = snapshot.meter_list.len(),
            "Roadway network index built",
        );

        Self {
            corridors: snapshot.corridor_list,
            rnodes,
            detectors: snapshot.detector_list,
            meters: snapshot.meter_list,
            station_index,
            config_stamp: snapshot.config.infra_cfg_date,
            api_urls: snapshot.api_urls,
        }
    }

    /// Configuration date stamp of the snapshot, if the server sent one.
    pub fn config_stamp(&self) -> Option<&str> {
        self.config_stamp.as_deref()
    }

    /// Server endpoint map shipped with the snapshot.
    pub fn api_urls(&self) -> &HashMap<String, String> {
        &self.api_urls
    }

    pub fn corridors(&self) -> &[CorridorInfo] {
        &self.corridors
    }

    pub fn corridor(&self, name: &str) -> Option<&CorridorInfo> {
        self.corridors.iter().find(|c| c.name == name)
    }

    /// Corridor by roadway designation and direction, e.g. `("I-35W", "NB")`.
    pub fn corridor_by_dir(&self, route: &str, dir: &str) -> Option<&CorridorInfo> {
        self.corridors
            .iter()
            .find(|c| c.route == route && c.dir == dir)
    }

    /// Node by name; station ids (leading `S`) are resolved through the
    /// station index.
    pub fn rnode(&self, name: &str) -> Option<&RNodeInfo> {
        if name.starts_with('S') && !self.rnodes.contains_key(name) {
            return self.rnode_by_station_id(name);
        }
        self.rnodes.get(name)
    }

    pub fn rnode_by_station_id(&self, station_id: &str) -> Option<&RNodeInfo> {
        self.station_index
            .get(station_id)
            .and_then(|name| self.rnodes.get(name))
    }

    pub fn detector(&self, name: &str) -> Option<&DetectorInfo> {
        self.detectors.get(name)
    }

    pub fn meter(&self, name: &str) -> Option<&MeterInfo> {
        self.meters.get(name)
    }

    /// Resolve a route's rnode names, failing on the first unknown name.
    pub fn route_rnodes<'a>(&'a self, route: &Route) -> Result<Vec<&'a RNodeInfo>, InfraError> {
        route
            .rnodes
            .iter()
            .map(|name| {
                self.rnode(name)
                    .ok_or_else(|| InfraError::UnknownRNode(name.clone()))
            })
            .collect()
    }

    /// Corridor names a route passes through, in first-touch order.
    pub fn route_corridors(&self, route: &Route) -> Result<Vec<String>, InfraError> {
        let mut corridors: Vec<String> = Vec::new();
        for rnode in self.route_rnodes(route)? {
            if !corridors.iter().any(|c| *c == rnode.corridor) {
                corridors.push(rnode.corridor.clone());
            }
        }
        Ok(corridors)
    }

    /// Build a route covering the contiguous corridor extent between two
    /// stations (inclusive), walking the corridor's node ordering.
    pub fn route_between_stations(
        &self,
        corridor_name: &str,
        start_station: &str,
        end_station: &str,
        name: &str,
        desc: &str,
    ) -> Result<Route, InfraError> {
        let corridor = self
            .corridor(corridor_name)
            .ok_or_else(|| InfraError::UnknownCorridor(corridor_name.to_string()))?;

        let start_name = self
            .rnode_by_station_id(start_station)
            .ok_or_else(|| InfraError::UnknownStation(start_station.to_string()))?
            .name
            .clone();
        let end_name = self
            .rnode_by_station_id(end_station)
            .ok_or_else(|| InfraError::UnknownStation(end_station.to_string()))?
            .name
            .clone();

        let start_pos = corridor
            .rnodes
            .iter()
            .position(|n| *n == start_name)
            .ok_or_else(|| InfraError::UnknownStation(start_station.to_string()))?;
        let end_pos = corridor
            .rnodes
            .iter()
            .position(|n| *n == end_name)
            .ok_or_else(|| InfraError::UnknownStation(end_station.to_string()))?;

        let (lo, hi) = if start_pos <= end_pos {
            (start_pos, end_pos)
        } else {
            (end_pos, start_pos)
        };

        let mut route = Route::new(name, desc);
        for rnode_name in &corridor.rnodes[lo..=hi] {
            route.add_rnode(rnode_name.clone());
        }
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InfraConfigInfo, RNodeType};

    fn station(name: &str, corridor: &str, station_id: &str, lat: f64) -> RNodeInfo {
        RNodeInfo {
            name: name.into(),
            corridor: corridor.into(),
            n_type: RNodeType::Station,
            station_id: Some(station_id.into()),
            label: None,
            lat,
            lon: -93.2,
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
        }
    }

    fn entrance(name: &str, corridor: &str, lat: f64) -> RNodeInfo {
        RNodeInfo {
            n_type: RNodeType::Entrance,
            station_id: None,
            label: Some("46th St".into()),
            ..station(name, corridor, "", lat)
        }
    }

    fn sample_infra() -> Infra {
        let corridor = CorridorInfo {
            name: "I-35W (NB)".into(),
            route: "I-35W".into(),
            dir: "NB".into(),
            rnodes: vec![
                "rnd_1".into(),
                "rnd_2".into(),
                "rnd_3".into(),
                "rnd_4".into(),
                "rnd_5".into(),
            ],
            stations: vec!["rnd_1".into(), "rnd_3".into(), "rnd_5".into()],
        };

        let mut rnode_list = HashMap::new();
        rnode_list.insert("rnd_1".into(), station("rnd_1", "I-35W (NB)", "S100", 44.90));
        rnode_list.insert("rnd_2".into(), entrance("rnd_2", "I-35W (NB)", 44.91));
        rnode_list.insert("rnd_3".into(), station("rnd_3", "I-35W (NB)", "S101", 44.92));
        rnode_list.insert("rnd_4".into(), entrance("rnd_4", "I-35W (NB)", 44.93));
        rnode_list.insert("rnd_5".into(), station("rnd_5", "I-35W (NB)", "S102", 44.94));

        Infra::build(InfraSnapshot {
            config: InfraConfigInfo {
                infra_cfg_date: Some("2020-01-01".into()),
            },
            corridor_list: vec![corridor],
            rnode_list,
            detector_list: HashMap::new(),
            meter_list: HashMap::new(),
            api_urls: HashMap::new(),
        })
    }

    #[test]
    fn station_order_assigned_per_corridor() {
        let infra = sample_infra();
        assert_eq!(infra.rnode("rnd_1").unwrap().order, Some(0));
        assert_eq!(infra.rnode("rnd_3").unwrap().order, Some(1));
        assert_eq!(infra.rnode("rnd_5").unwrap().order, Some(2));
        assert_eq!(infra.rnode("rnd_2").unwrap().order, None);
    }

    #[test]
    fn station_id_lookup_resolves() {
        let infra = sample_infra();
        assert_eq!(infra.rnode("S101").unwrap().name, "rnd_3");
        assert!(infra.rnode("S999").is_none());
    }

    #[test]
    fn corridor_lookup_by_route_and_dir() {
        let infra = sample_infra();
        assert!(infra.corridor_by_dir("I-35W", "NB").is_some());
        assert!(infra.corridor_by_dir("I-35W", "SB").is_none());
    }

    #[test]
    fn route_between_stations_includes_ramps() {
        let infra = sample_infra();
        let route = infra
            .route_between_stations("I-35W (NB)", "S100", "S102", "test", "")
            .unwrap();
        assert_eq!(
            route.rnodes,
            vec!["rnd_1", "rnd_2", "rnd_3", "rnd_4", "rnd_5"]
        );
    }

    #[test]
    fn route_between_stations_normalizes_direction() {
        let infra = sample_infra();
        let route = infra
            .route_between_stations("I-35W (NB)", "S102", "S100", "test", "")
            .unwrap();
        assert_eq!(route.len(), 5);
    }

    #[test]
    fn route_corridors_deduplicates() {
        let infra = sample_infra();
        let mut route = Route::new("r", "");
        route.add_rnode("rnd_1");
        route.add_rnode("rnd_3");
        assert_eq!(
            infra.route_corridors(&route).unwrap(),
            vec!["I-35W (NB)".to_string()]
        );
    }

    #[test]
    fn unknown_rnode_is_an_error() {
        let infra = sample_infra();
        let mut route = Route::new("r", "");
        route.add_rnode("rnd_404");
        assert!(infra.route_rnodes(&route).is_err());
    }
}
