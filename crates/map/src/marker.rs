//! Markers and polylines derived from roadway-network objects.

use serde::Serialize;
use tetres_core::route::Route;
use tetres_infra::{DetectorInfo, Infra, InfraError, MeterInfo, RNodeInfo, RNodeType};

/// What a marker represents on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Station,
    Entrance,
    Exit,
    Detector,
    Meter,
    Other,
}

impl From<RNodeType> for MarkerKind {
    fn from(n_type: RNodeType) -> Self {
        match n_type {
            RNodeType::Station => MarkerKind::Station,
            RNodeType::Entrance => MarkerKind::Entrance,
            RNodeType::Exit => MarkerKind::Exit,
            _ => MarkerKind::Other,
        }
    }
}

/// Visual state of a marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerState {
    #[default]
    Normal,
    Selected,
}

/// One point of interest handed to the map widget.
#[derive(Debug, Clone, Serialize)]
pub struct InfraMarker {
    /// Network object name, e.g. `"rnd_95"` or a detector name.
    pub name: String,
    /// Tooltip / list label.
    pub label: String,
    pub kind: MarkerKind,
    pub state: MarkerState,
    pub lat: f64,
    pub lon: f64,
}

impl InfraMarker {
    /// Marker for a roadway-network node.
    pub fn from_rnode(rnode: &RNodeInfo) -> Self {
        Self {
            name: rnode.name.clone(),
            label: rnode.display_label(),
            kind: rnode.n_type.into(),
            state: MarkerState::Normal,
            lat: rnode.lat,
            lon: rnode.lon,
        }
    }

    /// Marker for a detector, placed at its station's coordinate.
    pub fn from_detector(detector: &DetectorInfo, at: &RNodeInfo) -> Self {
        Self {
            name: detector.name.clone(),
            label: detector
                .label
                .clone()
                .unwrap_or_else(|| detector.name.clone()),
            kind: MarkerKind::Detector,
            state: MarkerState::Normal,
            lat: at.lat,
            lon: at.lon,
        }
    }

    /// Marker for a ramp meter, placed at its entrance's coordinate.
    pub fn from_meter(meter: &MeterInfo, at: &RNodeInfo) -> Self {
        Self {
            name: meter.name.clone(),
            label: meter.label.clone().unwrap_or_else(|| meter.name.clone()),
            kind: MarkerKind::Meter,
            state: MarkerState::Normal,
            lat: at.lat,
            lon: at.lon,
        }
    }

    pub fn selected(mut self) -> Self {
        self.state = MarkerState::Selected;
        self
    }
}

/// Markers for every node of a corridor, in travel order.
pub fn corridor_markers(infra: &Infra, corridor_name: &str) -> Result<Vec<InfraMarker>, InfraError> {
    let corridor = infra
        .corridor(corridor_name)
        .ok_or_else(|| InfraError::UnknownCorridor(corridor_name.to_string()))?;

    corridor
        .rnodes
        .iter()
        .map(|name| {
            infra
                .rnode(name)
                .map(InfraMarker::from_rnode)
                .ok_or_else(|| InfraError::UnknownRNode(name.clone()))
        })
        .collect()
}

/// Geographic extent of a set of points, for the initial viewport fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// A route rendered as an ordered polyline of waypoints.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePath {
    pub name: String,
    /// `(lat, lon)` pairs from upstream to downstream.
    pub waypoints: Vec<(f64, f64)>,
}

impl RoutePath {
    /// Resolve a route's nodes into waypoints.
    pub fn from_route(infra: &Infra, route: &Route) -> Result<Self, InfraError> {
        let waypoints = infra
            .route_rnodes(route)?
            .iter()
            .map(|rn| (rn.lat, rn.lon))
            .collect();
        Ok(Self {
            name: route.name.clone(),
            waypoints,
        })
    }

    /// Extent of the polyline; `None` when the route is empty.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let (&(first_lat, first_lon), rest) = self.waypoints.split_first()?;
        let mut bbox = BoundingBox {
            min_lat: first_lat,
            min_lon: first_lon,
            max_lat: first_lat,
            max_lon: first_lon,
        };
        for &(lat, lon) in rest {
            bbox.min_lat = bbox.min_lat.min(lat);
            bbox.min_lon = bbox.min_lon.min(lon);
            bbox.max_lat = bbox.max_lat.max(lat);
            bbox.max_lon = bbox.max_lon.max(lon);
        }
        Some(bbox)
    }
}
