//! Special events: stadium games, fairs and similar demand spikes,
//! located by a single venue coordinate.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::datetime;
use crate::entity::EntityInfo;
use crate::error::CoreError;
use crate::types::DbId;
use crate::validation;

/// A venue event with an expected attendance.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SpecialEventInfo {
    pub id: Option<DbId>,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    /// Wire timestamp, `%Y-%m-%d %H:%M:%S`.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[validate(range(min = 0, message = "attendance must not be negative"))]
    pub attendance: Option<i64>,
    /// Comma-separated year list derived from the time range.
    pub years: Option<String>,
}

impl SpecialEventInfo {
    /// Number of columns a bulk-import CSV row must have.
    pub const CSV_COLUMNS: usize = 8;

    /// Build an event from a bulk-import CSV row.
    ///
    /// Column layout: `Date, Start Time, End Time, Title, Type,
    /// Attendance, Lat, Lon`.  Start and end share the date column.
    pub fn from_csv_row(row: &[&str]) -> Result<Self, CoreError> {
        if row.len() < Self::CSV_COLUMNS {
            return Err(CoreError::Parse(format!(
                "special event row needs {} columns, got {}",
                Self::CSV_COLUMNS,
                row.len()
            )));
        }

        let attendance: i64 = row[5]
            .trim()
            .parse()
            .map_err(|_| CoreError::Parse(format!("invalid attendance {:?}", row[5])))?;
        let lat: f64 = row[6]
            .trim()
            .parse()
            .map_err(|_| CoreError::Parse(format!("invalid latitude {:?}", row[6])))?;
        let lon: f64 = row[7]
            .trim()
            .parse()
            .map_err(|_| CoreError::Parse(format!("invalid longitude {:?}", row[7])))?;

        let mut event = Self {
            name: Some(row[3].trim().to_string()),
            description: Some(row[4].trim().to_string()),
            start_time: Some(format!("{} {}", row[0].trim(), row[1].trim())),
            end_time: Some(format!("{} {}", row[0].trim(), row[2].trim())),
            lat: Some(lat),
            lon: Some(lon),
            attendance: Some(attendance),
            ..Default::default()
        };
        event.set_years()?;
        Ok(event)
    }

    /// Recompute the denormalized `years` field from the time range.
    pub fn set_years(&mut self) -> Result<(), CoreError> {
        self.years = Some(datetime::years_of_range(
            self.start_time.as_deref().unwrap_or_default(),
            self.end_time.as_deref().unwrap_or_default(),
        )?);
        Ok(())
    }

    /// Duration label for list panels (`"2018-01-25 ~ 27"`).
    pub fn duration_label(&self) -> Result<String, CoreError> {
        datetime::duration_label(
            self.start_time.as_deref().unwrap_or_default(),
            self.end_time.as_deref().unwrap_or_default(),
        )
    }
}

impl EntityInfo for SpecialEventInfo {
    const ENTITY: &'static str = "special event";

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
        validation::check(self)?;
        validation::require("start_time", self.start_time.as_deref())?;
        validation::require("end_time", self.end_time.as_deref())?;
        datetime::check_time_order(
            self.start_time.as_deref().unwrap_or_default(),
            self.end_time.as_deref().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROW: [&str; 8] = [
        "2018-09-22",
        "19:00:00",
        "22:30:00",
        "Gopher Football",
        "Football",
        "48000",
        "44.976",
        "-93.224",
    ];

    #[test]
    fn csv_row_builds_event() {
        let event = SpecialEventInfo::from_csv_row(&ROW).unwrap();
        assert_eq!(event.name.as_deref(), Some("Gopher Football"));
        assert_eq!(event.start_time.as_deref(), Some("2018-09-22 19:00:00"));
        assert_eq!(event.end_time.as_deref(), Some("2018-09-22 22:30:00"));
        assert_eq!(event.attendance, Some(48000));
        assert_eq!(event.years.as_deref(), Some("2018"));
    }

    #[test]
    fn csv_row_rejects_short_rows() {
        assert!(SpecialEventInfo::from_csv_row(&ROW[..6]).is_err());
    }

    #[test]
    fn csv_row_rejects_bad_numbers() {
        let mut row = ROW;
        row[5] = "lots";
        assert!(SpecialEventInfo::from_csv_row(&row).is_err());
    }

    #[test]
    fn set_years_spans_new_year() {
        let mut event = SpecialEventInfo {
            start_time: Some("2018-12-31 20:00:00".into()),
            end_time: Some("2019-01-01 02:00:00".into()),
            ..Default::default()
        };
        event.set_years().unwrap();
        assert_eq!(event.years.as_deref(), Some("2018,2019"));
    }

    #[test]
    fn check_rejects_negative_attendance() {
        let mut event = SpecialEventInfo::from_csv_row(&ROW).unwrap();
        event.attendance = Some(-5);
        assert!(event.check().is_err());
    }
}
