//! Snow-operations records: plow truck routes, snow events, and the
//! per-route lane-loss management entries connecting the two.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::datetime;
use crate::entity::EntityInfo;
use crate::error::CoreError;
use crate::route::Route;
use crate::types::DbId;
use crate::validation;

/// A plow truck route, stored as both roadway directions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SnowRouteInfo {
    pub id: Option<DbId>,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    /// Maintenance project id from the plowing authority.
    pub prj_id: Option<String>,
    pub route1: Option<Route>,
    pub route2: Option<Route>,
}

impl EntityInfo for SnowRouteInfo {
    const ENTITY: &'static str = "snow route";

    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = Some(id);
    }

    fn sort_key(&self) -> String {
        self.name.clone().unwrap_or_default()
    }

    fn check(&self) -> Result<(), CoreError> {
        validation::check(self)?;
        match &self.route1 {
            Some(r) if !r.is_empty() => Ok(()),
            _ => Err(CoreError::Validation("route1 must contain rnodes".into())),
        }
    }
}

/// A snowfall event time range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnowEventInfo {
    pub id: Option<DbId>,
    /// Wire timestamp, `%Y-%m-%d %H:%M:%S`.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl EntityInfo for SnowEventInfo {
    const ENTITY: &'static str = "snow event";

    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = Some(id);
    }

    fn sort_key(&self) -> String {
        self.start_time.clone().unwrap_or_default()
    }

    fn check(&self) -> Result<(), CoreError> {
        validation::require("start_time", self.start_time.as_deref())?;
        validation::require("end_time", self.end_time.as_deref())?;
        datetime::check_time_order(
            self.start_time.as_deref().unwrap_or_default(),
            self.end_time.as_deref().unwrap_or_default(),
        )
    }
}

/// Lane lost/regained bookkeeping for one snow route during one event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnowManagementInfo {
    pub id: Option<DbId>,
    /// Id of the [`SnowRouteInfo`] this entry belongs to.
    pub sroute_id: Option<DbId>,
    /// Id of the [`SnowEventInfo`] this entry belongs to.
    pub sevent_id: Option<DbId>,
    pub lane_lost_time: Option<String>,
    pub lane_regain_time: Option<String>,
    /// Hours between lane loss and regain.
    pub duration: Option<f64>,
}

impl SnowManagementInfo {
    /// Recompute `duration` (hours) from the lost/regain timestamps.
    pub fn set_duration(&mut self) -> Result<(), CoreError> {
        let lost = datetime::parse_datetime(self.lane_lost_time.as_deref().unwrap_or_default())?;
        let regain =
            datetime::parse_datetime(self.lane_regain_time.as_deref().unwrap_or_default())?;
        self.duration = Some((regain - lost).num_seconds() as f64 / 3600.0);
        Ok(())
    }
}

impl EntityInfo for SnowManagementInfo {
    const ENTITY: &'static str = "snow management";

    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = Some(id);
    }

    fn sort_key(&self) -> String {
        self.lane_lost_time.clone().unwrap_or_default()
    }

    fn check(&self) -> Result<(), CoreError> {
        if self.sroute_id.is_none() {
            return Err(CoreError::Validation("snow route is required".into()));
        }
        if self.sevent_id.is_none() {
            return Err(CoreError::Validation("snow event is required".into()));
        }
        datetime::check_time_order(
            self.lane_lost_time.as_deref().unwrap_or_default(),
            self.lane_regain_time.as_deref().unwrap_or_default(),
        )
    }
}
