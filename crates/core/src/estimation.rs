//! Estimation request parameters submitted to the analysis server.
//!
//! These records are upload-only: the client assembles them from the
//! estimation form, the server consumes them and never sends them back.

use serde::{Deserialize, Serialize};

use crate::datetime;
use crate::error::CoreError;
use crate::ttroute::TTRouteInfo;
use crate::validation;

/// Weekday filter for the analysis period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayConditionInfo {
    pub sunday: bool,
    pub monday: bool,
    pub tuesday: bool,
    pub wednesday: bool,
    pub thursday: bool,
    pub friday: bool,
    pub saturday: bool,
}

impl WeekdayConditionInfo {
    /// Monday-through-Friday preset.
    pub fn weekdays_only() -> Self {
        Self {
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            ..Default::default()
        }
    }

    /// Selected weekdays as server ordinals (Monday = 0 .. Sunday = 6).
    pub fn weekday_numbers(&self) -> Vec<u8> {
        let mut numbers = Vec::new();
        if self.sunday {
            numbers.push(6);
        }
        if self.monday {
            numbers.push(0);
        }
        if self.tuesday {
            numbers.push(1);
        }
        if self.wednesday {
            numbers.push(2);
        }
        if self.thursday {
            numbers.push(3);
        }
        if self.friday {
            numbers.push(4);
        }
        if self.saturday {
            numbers.push(5);
        }
        numbers
    }

    pub fn any_selected(&self) -> bool {
        !self.weekday_numbers().is_empty()
    }
}

/// Which reliability aggregations the server should compute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReliabilityEstimationModeInfo {
    pub mode_daily: bool,
    pub mode_tod: bool,
    pub mode_whole: bool,
}

impl ReliabilityEstimationModeInfo {
    pub fn any_selected(&self) -> bool {
        self.mode_daily || self.mode_tod || self.mode_whole
    }
}

/// Weather filter inside an operating condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherConditionInfo {
    #[serde(rename = "type")]
    pub weather_type: Option<String>,
    pub intensity: Option<String>,
}

/// Incident filter inside an operating condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncidentConditionInfo {
    #[serde(rename = "type")]
    pub incident_type: Option<String>,
    pub impact: Option<String>,
    pub severity: Option<String>,
}

/// Work zone filter inside an operating condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkzoneConditionInfo {
    pub relative_location: Option<String>,
    pub impact: Option<String>,
    pub workzone_length: Option<String>,
}

/// Special event filter inside an operating condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecialeventConditionInfo {
    pub distance: Option<String>,
    pub event_size: Option<String>,
    pub event_time: Option<String>,
}

/// Snow management filter inside an operating condition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnowmanagementConditionInfo {
    pub road_condition: Option<String>,
}

/// A named bundle of condition filters; travel times matching every
/// selected filter are aggregated into one reliability regime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatingConditionsInfo {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub weather_conditions: Vec<WeatherConditionInfo>,
    pub incident_conditions: Vec<IncidentConditionInfo>,
    pub workzone_conditions: Vec<WorkzoneConditionInfo>,
    pub specialevent_conditions: Vec<SpecialeventConditionInfo>,
    pub snowmanagement_conditions: Vec<SnowmanagementConditionInfo>,
}

/// Numeric thresholds behind the categorical condition filters
/// (distance bands in miles, event sizes in attendance).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatingConditionParameterInfo {
    pub incident_downstream_distance_limit: Option<f64>,
    pub incident_upstream_distance_limit: Option<f64>,
    pub incident_keep_in_minute: Option<i32>,

    pub workzone_downstream_distance_limit: Option<f64>,
    pub workzone_upstream_distance_limit: Option<f64>,
    pub workzone_length_short_from: Option<f64>,
    pub workzone_length_short_to: Option<f64>,
    pub workzone_length_medium_from: Option<f64>,
    pub workzone_length_medium_to: Option<f64>,
    pub workzone_length_long_from: Option<f64>,
    pub workzone_length_long_to: Option<f64>,

    pub specialevent_size_small_from: Option<i64>,
    pub specialevent_size_small_to: Option<i64>,
    pub specialevent_size_medium_from: Option<i64>,
    pub specialevent_size_medium_to: Option<i64>,
    pub specialevent_size_large_from: Option<i64>,
    pub specialevent_size_large_to: Option<i64>,
    pub specialevent_distance_near_from: Option<f64>,
    pub specialevent_distance_near_to: Option<f64>,
    pub specialevent_distance_middle_from: Option<f64>,
    pub specialevent_distance_middle_to: Option<f64>,
    pub specialevent_distance_far_from: Option<f64>,
    pub specialevent_distance_far_to: Option<f64>,
}

/// Full estimation request as posted to the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimationRequestInfo {
    /// Filled by the server from the posted route ids; left empty here.
    pub travel_time_route: Option<TTRouteInfo>,
    /// Analysis period, date-only wire format.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Daily time window, time-of-day wire format.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub weekdays: Option<WeekdayConditionInfo>,
    pub except_holiday: Option<bool>,
    // The field name on the wire is historically misspelled; every tier
    // of the deployed system expects it as-is.
    #[serde(rename = "estmation_mode")]
    pub estimation_mode: Option<ReliabilityEstimationModeInfo>,
    pub operating_conditions: Vec<OperatingConditionsInfo>,
    pub oc_param: Option<OperatingConditionParameterInfo>,
    pub write_spreadsheets: Option<bool>,
    pub write_graph_images: Option<bool>,
    pub write_moe_spreadsheet: Option<bool>,
}

impl EstimationRequestInfo {
    /// Client-side checks before submission.
    ///
    /// The server rejects requests without `oc_param` outright; the rest
    /// of the checks catch forms that would produce an empty analysis.
    pub fn check(&self) -> Result<(), CoreError> {
        validation::require("start_date", self.start_date.as_deref())?;
        validation::require("end_date", self.end_date.as_deref())?;
        let start = datetime::parse_date(self.start_date.as_deref().unwrap_or_default())?;
        let end = datetime::parse_date(self.end_date.as_deref().unwrap_or_default())?;
        if start > end {
            return Err(CoreError::Validation(
                "start date is after end date".into(),
            ));
        }

        if let Some(s) = self.start_time.as_deref() {
            datetime::parse_time(s)?;
        }
        if let Some(s) = self.end_time.as_deref() {
            datetime::parse_time(s)?;
        }

        match self.weekdays {
            Some(w) if w.any_selected() => {}
            _ => {
                return Err(CoreError::Validation(
                    "at least one weekday must be selected".into(),
                ))
            }
        }
        match self.estimation_mode {
            Some(m) if m.any_selected() => {}
            _ => {
                return Err(CoreError::Validation(
                    "at least one estimation mode must be selected".into(),
                ))
            }
        }
        if self.oc_param.is_none() {
            return Err(CoreError::Validation(
                "operating condition parameters are required".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> EstimationRequestInfo {
        EstimationRequestInfo {
            start_date: Some("2019-01-01".into()),
            end_date: Some("2019-03-31".into()),
            start_time: Some("06:00:00".into()),
            end_time: Some("09:00:00".into()),
            weekdays: Some(WeekdayConditionInfo::weekdays_only()),
            estimation_mode: Some(ReliabilityEstimationModeInfo {
                mode_daily: true,
                ..Default::default()
            }),
            oc_param: Some(OperatingConditionParameterInfo::default()),
            write_spreadsheets: Some(true),
            ..Default::default()
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(valid_request().check().is_ok());
    }

    #[test]
    fn request_requires_oc_param() {
        let mut req = valid_request();
        req.oc_param = None;
        assert!(req.check().is_err());
    }

    #[test]
    fn request_rejects_inverted_dates() {
        let mut req = valid_request();
        req.start_date = Some("2019-06-01".into());
        assert!(req.check().is_err());
    }

    #[test]
    fn request_requires_some_weekday() {
        let mut req = valid_request();
        req.weekdays = Some(WeekdayConditionInfo::default());
        assert!(req.check().is_err());
    }

    #[test]
    fn weekday_numbers_follow_server_ordinals() {
        let weekdays = WeekdayConditionInfo {
            sunday: true,
            monday: true,
            saturday: true,
            ..Default::default()
        };
        assert_eq!(weekdays.weekday_numbers(), vec![6, 0, 5]);
    }

    #[test]
    fn estimation_mode_keeps_wire_spelling() {
        let req = valid_request();
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("estmation_mode").is_some());
        assert!(json.get("estimation_mode").is_none());
    }
}
