//! Statistics produced by the aggregators.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::filters::Filters;

/// A label together with how many trips carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popular {
    pub label: String,
    pub count: usize,
}

/// Most used start station, end station and journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub start_station: Option<Popular>,
    pub end_station: Option<Popular>,
    pub journey: Option<Popular>,
}

/// A duration split into hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hms {
    pub hours: f64,
    pub minutes: f64,
    pub seconds: f64,
}

impl Hms {
    /// Splits `seconds` by repeated floor division by 60.
    pub fn from_seconds(seconds: f64) -> Self {
        let minutes = (seconds / 60.0).floor();
        let seconds = seconds - minutes * 60.0;
        let hours = (minutes / 60.0).floor();
        let minutes = minutes - hours * 60.0;
        Self {
            hours,
            minutes,
            seconds,
        }
    }
}

/// Seconds rounded to milliseconds, without trailing zeros.
pub fn format_seconds(seconds: f64) -> String {
    let text = format!("{seconds:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}h {}m {}s",
            self.hours,
            self.minutes,
            format_seconds(self.seconds)
        )
    }
}

/// Total and mean trip duration, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationStats {
    pub total_seconds: f64,
    pub total: Hms,
    pub mean_seconds: Option<f64>,
    pub mean: Option<Hms>,
}

/// Gender counts and birth-year extremes, for datasets that record them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Demographics {
    pub gender_counts: BTreeMap<String, usize>,
    pub earliest_birth_year: Option<i64>,
    pub most_recent_birth_year: Option<i64>,
    pub most_common_birth_year: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub user_type_counts: BTreeMap<String, usize>,
    /// `None` when the city's dataset has no gender/birth-year columns.
    pub demographics: Option<Demographics>,
}

/// Everything computed for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub filters: Filters,
    pub trips: usize,
    pub stations: StationStats,
    pub durations: DurationStats,
    pub users: UserStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hms_from_seconds() {
        assert_eq!(
            Hms::from_seconds(360.0),
            Hms {
                hours: 0.0,
                minutes: 6.0,
                seconds: 0.0
            }
        );
        assert_eq!(Hms::from_seconds(3725.5).to_string(), "1h 2m 5.5s");
        assert_eq!(Hms::from_seconds(0.0).to_string(), "0h 0m 0s");
    }

    #[test]
    fn test_hms_display_drops_float_noise() {
        let hms = Hms::from_seconds(489.066 + 402.549);
        assert_eq!(hms.to_string(), "0h 14m 51.615s");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(360.0), "360");
        assert_eq!(format_seconds(891.6150000000001), "891.615");
        assert_eq!(format_seconds(12.5), "12.5");
        assert_eq!(format_seconds(0.0001), "0");
    }
}
