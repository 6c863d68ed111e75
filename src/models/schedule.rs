use super::{client::Client, pet::Pet, service::Service};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Timelike, Utc};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize, Serializer};

/// Appointment date-time, always held as a UTC instant with an explicit
/// `+00:00` offset.
pub type DateSchedule = DateTime<FixedOffset>;

const NAIVE_DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const OFFSET_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z"];

const MAX_YEAR: i32 = 9999;

#[derive(Debug, Display, Error)]
pub enum DateScheduleError {
    #[display("{_0}")]
    Unparsable(chrono::ParseError),
    #[display("year {_0} is outside 0000-9999")]
    YearOutOfRange(#[error(not(source))] i32),
}

/// Writes the date as RFC3339 with a numeric offset, `+00:00` instead of `Z`
fn serialize_date_schedule<S: Serializer>(
    date: &DateSchedule,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.to_rfc3339())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Schedule {
    pub id: i64,
    #[serde(serialize_with = "serialize_date_schedule")]
    pub date_schedule: DateSchedule,
    pub client_id: i64,
    pub pet_id: i64,
}

/// Schedule with its owner, pet and services resolved
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScheduleDetails {
    pub id: i64,
    #[serde(serialize_with = "serialize_date_schedule")]
    pub date_schedule: DateSchedule,
    pub client: Client,
    pub pet: Pet,
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScheduleWithServices {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub services: Vec<Service>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchedulePatch {
    pub date_schedule: Option<String>,
    pub client_id: Option<i64>,
    pub pet_id: Option<i64>,
}

impl SchedulePatch {
    /// Overwrites the supplied fields. The raw date goes through
    /// [`parse_date_schedule`] before anything is touched.
    pub fn apply(self, schedule: &mut Schedule) -> Result<(), DateScheduleError> {
        let date_schedule = self
            .date_schedule
            .as_deref()
            .map(parse_date_schedule)
            .transpose()?;

        if let Some(date_schedule) = date_schedule {
            schedule.date_schedule = date_schedule;
        }
        if let Some(client_id) = self.client_id {
            schedule.client_id = client_id;
        }
        if let Some(pet_id) = self.pet_id {
            schedule.pet_id = pet_id;
        }
        Ok(())
    }
}

/// Parses an ISO-8601 appointment date.
///
/// A trailing `Z` is read as `+00:00`, a date-time without offset is taken
/// as UTC, and the result is converted to UTC and truncated to microseconds.
/// Years past four digits are rejected.
pub fn parse_date_schedule(raw: &str) -> Result<DateSchedule, DateScheduleError> {
    let raw = raw.trim();
    let normalized = match raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        Some(without_marker) => format!("{without_marker}+00:00"),
        None => raw.to_string(),
    };

    let parsed = DateTime::parse_from_rfc3339(&normalized).or_else(|rfc_err| {
        OFFSET_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(&normalized, fmt).ok())
            .or_else(|| {
                NAIVE_DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
                    .map(|naive| naive.and_utc().fixed_offset())
            })
            .ok_or(rfc_err)
    })
    .map_err(DateScheduleError::Unparsable)?;

    let date = to_utc_offset(parsed);
    if !(0..=MAX_YEAR).contains(&date.year()) {
        return Err(DateScheduleError::YearOutOfRange(date.year()));
    }

    let micros = date.nanosecond() / 1_000 * 1_000;
    Ok(date.with_nanosecond(micros).unwrap_or(date))
}

pub fn to_utc_offset(date: DateSchedule) -> DateSchedule {
    date.with_timezone(&Utc).fixed_offset()
}

/// Half-open `[first day of month, first day of next month)` range in UTC,
/// `None` for an impossible year/month pair.
pub fn month_bounds(year: i32, month: u32) -> Option<(DateSchedule, DateSchedule)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    Some((
        start.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset(),
        end.and_hms_opt(0, 0, 0)?.and_utc().fixed_offset(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_z_is_normalized_to_offset() {
        let date = parse_date_schedule("2024-06-01T10:00:00Z").unwrap();

        assert_eq!(date.to_rfc3339(), "2024-06-01T10:00:00+00:00");

        let schedule = Schedule {
            id: 1,
            date_schedule: date,
            client_id: 1,
            pet_id: 1,
        };
        assert_eq!(
            serde_json::to_value(&schedule).unwrap()["date_schedule"],
            serde_json::json!("2024-06-01T10:00:00+00:00")
        );
    }

    #[test]
    fn test_expanded_year_is_rejected() {
        assert!(matches!(
            parse_date_schedule("+12345-06-01T10:00:00"),
            Err(DateScheduleError::YearOutOfRange(12345))
        ));
        assert!(matches!(
            parse_date_schedule("9999-12-31T23:00:00-03:00"),
            Err(DateScheduleError::YearOutOfRange(10000))
        ));
        assert!(parse_date_schedule("9999-12-31T23:00:00Z").is_ok());
    }

    #[test]
    fn test_sub_microsecond_digits_are_dropped() {
        let date = parse_date_schedule("2024-06-01T10:00:00.123456789Z").unwrap();

        assert_eq!(date.to_rfc3339(), "2024-06-01T10:00:00.123456+00:00");
    }

    #[test]
    fn test_naive_date_is_taken_as_utc() {
        let date = parse_date_schedule("2024-06-01T10:00:00").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-06-01T10:00:00+00:00");

        let date = parse_date_schedule("2024-06-01 10:00").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-06-01T10:00:00+00:00");
    }

    #[test]
    fn test_offset_is_converted_to_utc() {
        let date = parse_date_schedule("2024-06-01T10:00:00-03:00").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-06-01T13:00:00+00:00");

        let date = parse_date_schedule("2024-06-01T10:00+02:00").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-06-01T08:00:00+00:00");
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        assert!(parse_date_schedule("not a date").is_err());
        assert!(parse_date_schedule("2024-13-01T10:00:00Z").is_err());
        assert!(parse_date_schedule("").is_err());
    }

    #[test]
    fn test_month_bounds_december_rolls_year() {
        let (start, end) = month_bounds(2024, 12).unwrap();

        assert_eq!(start.to_rfc3339(), "2024-12-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_month_bounds_invalid_month() {
        assert!(month_bounds(2024, 13).is_none());
        assert!(month_bounds(2024, 0).is_none());
        assert!(month_bounds(2024, 2).is_some());
    }

    #[test]
    fn test_patch_with_invalid_date_leaves_schedule_untouched() {
        let original = Schedule {
            id: 1,
            date_schedule: parse_date_schedule("2024-06-01T10:00:00Z").unwrap(),
            client_id: 1,
            pet_id: 1,
        };
        let mut schedule = original.clone();

        let result = SchedulePatch {
            date_schedule: Some("yesterday".into()),
            pet_id: Some(9),
            ..SchedulePatch::default()
        }
        .apply(&mut schedule);

        assert!(result.is_err());
        assert_eq!(schedule, original);
    }

    #[test]
    fn test_patch_updates_date() {
        let mut schedule = Schedule {
            id: 1,
            date_schedule: parse_date_schedule("2024-06-01T10:00:00Z").unwrap(),
            client_id: 1,
            pet_id: 1,
        };

        SchedulePatch {
            date_schedule: Some("2024-07-01T09:30:00Z".into()),
            ..SchedulePatch::default()
        }
        .apply(&mut schedule)
        .unwrap();

        assert_eq!(schedule.date_schedule.to_rfc3339(), "2024-07-01T09:30:00+00:00");
        assert_eq!(schedule.pet_id, 1);
    }
}
