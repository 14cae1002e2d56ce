//! Work zone records: groups and the individual lane-closure entries
//! that belong to them.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::datetime;
use crate::entity::EntityInfo;
use crate::error::CoreError;
use crate::route::Route;
use crate::types::DbId;
use crate::validation;

/// A work zone project grouping several lane-closure configurations.
///
/// `years` and `corridors` are denormalized summaries maintained from the
/// member work zones so list screens can filter without joining.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct WorkZoneGroupInfo {
    pub id: Option<DbId>,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    /// Comma-separated year list, e.g. `"2018,2019"`.
    pub years: Option<String>,
    /// Comma-separated corridor names covered by the member work zones.
    pub corridors: Option<String>,
    pub impact: Option<String>,
}

impl EntityInfo for WorkZoneGroupInfo {
    const ENTITY: &'static str = "work zone group";

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
        validation::check(self)
    }
}

/// One lane-closure configuration inside a work zone group.
///
/// `route1` is the affected direction; `route2` the opposite direction,
/// kept so impact on the other roadway can be estimated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkZoneInfo {
    pub id: Option<DbId>,
    pub wz_group_id: Option<DbId>,
    pub memo: Option<String>,
    /// Wire timestamp, `%Y-%m-%d %H:%M:%S`.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub route1: Option<Route>,
    pub route2: Option<Route>,
    pub workzone_length: Option<f64>,
}

impl WorkZoneInfo {
    /// Duration label for list panels (`"2018-01-25 ~ 27"`).
    pub fn duration_label(&self) -> Result<String, CoreError> {
        datetime::duration_label(
            self.start_time.as_deref().unwrap_or_default(),
            self.end_time.as_deref().unwrap_or_default(),
        )
    }
}

impl EntityInfo for WorkZoneInfo {
    const ENTITY: &'static str = "work zone";

    fn id(&self) -> Option<DbId> {
        self.id
    }

    fn set_id(&mut self, id: DbId) {
        self.id = Some(id);
    }

    fn sort_key(&self) -> String {
        // Wire timestamps sort chronologically as strings.
        self.start_time.clone().unwrap_or_default()
    }

    /// The group link, a valid closed-lane route and an ordered time
    /// range are all required.
    fn check(&self) -> Result<(), CoreError> {
        if self.wz_group_id.is_none() {
            return Err(CoreError::Validation("work zone group is required".into()));
        }
        match &self.route1 {
            Some(r) if !r.is_empty() => {}
            _ => return Err(CoreError::Validation("route1 must contain rnodes".into())),
        }
        validation::require("start_time", self.start_time.as_deref())?;
        validation::require("end_time", self.end_time.as_deref())?;
        datetime::check_time_order(
            self.start_time.as_deref().unwrap_or_default(),
            self.end_time.as_deref().unwrap_or_default(),
        )
    }
}
