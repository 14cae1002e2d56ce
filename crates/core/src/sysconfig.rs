//! System-wide processing parameters, edited as a single record.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Server processing configuration.
///
/// One record per deployment; `update` replaces it wholesale.  Distance
/// limits are miles, windows are minutes, job start times use the
/// `%H:%M:%S` wire format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemConfigInfo {
    pub id: Option<DbId>,
    /// First year of archived traffic data to keep processed.
    pub data_archive_start_year: Option<i32>,

    // Periodic-job schedule.
    pub daily_job_start_time: Option<String>,
    pub daily_job_offset_days: Option<i32>,
    pub weekly_job_start_day: Option<String>,
    pub weekly_job_start_time: Option<String>,
    pub monthly_job_start_date: Option<i32>,
    pub monthly_job_start_time: Option<String>,

    // Categorization distance limits.
    pub incident_downstream_distance_limit: Option<f64>,
    pub incident_upstream_distance_limit: Option<f64>,
    pub workzone_downstream_distance_limit: Option<f64>,
    pub workzone_upstream_distance_limit: Option<f64>,
    pub specialevent_arrival_window: Option<i32>,
    pub specialevent_departure_window1: Option<i32>,
    pub specialevent_departure_window2: Option<i32>,

    // MOE parameters.
    pub moe_critical_density: Option<f64>,
    pub moe_lane_capacity: Option<f64>,
    pub moe_congestion_threshold_speed: Option<f64>,

    // Route-wise MOE overrides.
    pub reference_tt_route_id: Option<DbId>,
    pub rw_moe_critical_density: Option<f64>,
    pub rw_moe_lane_capacity: Option<f64>,
    pub rw_moe_congestion_threshold_speed: Option<f64>,
    pub rw_moe_start_date: Option<String>,
    pub rw_moe_end_date: Option<String>,
}

impl SystemConfigInfo {
    /// Reject obviously unusable parameter combinations before upload.
    pub fn check(&self) -> Result<(), CoreError> {
        for (name, value) in [
            ("moe_critical_density", self.moe_critical_density),
            ("moe_lane_capacity", self.moe_lane_capacity),
            (
                "moe_congestion_threshold_speed",
                self.moe_congestion_threshold_speed,
            ),
        ] {
            if let Some(v) = value {
                if v <= 0.0 {
                    return Err(CoreError::Validation(format!("{name} must be positive")));
                }
            }
        }
        if let Some(year) = self.data_archive_start_year {
            if year < 1990 {
                return Err(CoreError::Validation(format!(
                    "data_archive_start_year {year} predates the detector archive"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_rejects_nonpositive_moe_parameters() {
        let cfg = SystemConfigInfo {
            moe_lane_capacity: Some(0.0),
            ..Default::default()
        };
        assert!(cfg.check().is_err());
    }

    #[test]
    fn check_accepts_defaults() {
        assert!(SystemConfigInfo::default().check().is_ok());
    }
}
