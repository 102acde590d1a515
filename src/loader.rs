//! Calendar derivation, month/day filtering and forward-fill imputation.

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use crate::city::Column;
use crate::filters::{DayFilter, Filters, MonthFilter};
use crate::trips::{Trip, TripTable, read_trips};

/// Result of [`load_data`]: the working table plus missing-cell counts.
#[derive(Debug)]
pub struct LoadedTrips {
    pub table: TripTable,
    pub nulls_before_fill: usize,
    pub nulls_after_fill: usize,
}

/// Reads the CSV for `filters.city` from `data_dir` and prepares it.
#[tracing::instrument(skip(data_dir), fields(city = %filters.city, month = %filters.month, day = %filters.day))]
pub fn load_city(data_dir: &Path, filters: &Filters) -> Result<LoadedTrips> {
    let path = data_dir.join(filters.city.file_name());
    let raw = read_trips(&path, filters.city.schema())?;
    info!(rows = raw.len(), path = %path.display(), "Loaded city data");
    Ok(load_data(raw, filters.month, filters.day))
}

/// Adds the month and weekday columns, keeps only rows matching both
/// filters, then forward-fills missing values.
pub fn load_data(raw: TripTable, month: MonthFilter, day: DayFilter) -> LoadedTrips {
    let TripTable {
        schema,
        mut columns,
        trips,
    } = raw;
    let total = trips.len();

    columns.extend([Column::Month, Column::DayOfWeek]);
    let trips: Vec<Trip> = trips
        .into_iter()
        .map(|mut trip| {
            trip.derive_calendar();
            trip
        })
        .filter(|trip| month.matches(trip.month) && day.matches(trip.day_of_week))
        .collect();

    let mut table = TripTable::new(schema, columns, trips);
    debug!(total, kept = table.len(), "Applied month/day filters");

    let nulls_before_fill = table.null_count();
    forward_fill(&mut table);
    let nulls_after_fill = table.null_count();
    debug!(nulls_before_fill, nulls_after_fill, "Forward fill complete");

    LoadedTrips {
        table,
        nulls_before_fill,
        nulls_after_fill,
    }
}

/// Replaces each missing cell with the closest earlier value in its column.
/// Leading gaps stay missing.
pub fn forward_fill(table: &mut TripTable) {
    for column in table.columns.clone() {
        let trips = &mut table.trips;
        match column {
            Column::StartTime => fill_column(trips, |t| &mut t.start_time),
            Column::EndTime => fill_column(trips, |t| &mut t.end_time),
            Column::TripDuration => fill_column(trips, |t| &mut t.trip_duration),
            Column::StartStation => fill_column(trips, |t| &mut t.start_station),
            Column::EndStation => fill_column(trips, |t| &mut t.end_station),
            Column::UserType => fill_column(trips, |t| &mut t.user_type),
            Column::Gender => fill_column(trips, |t| &mut t.gender),
            Column::BirthYear => fill_column(trips, |t| &mut t.birth_year),
            Column::Month => fill_column(trips, |t| &mut t.month),
            Column::DayOfWeek => fill_column(trips, |t| &mut t.day_of_week),
        }
    }
}

fn fill_column<T, F>(trips: &mut [Trip], mut cell: F)
where
    T: Clone,
    F: FnMut(&mut Trip) -> &mut Option<T>,
{
    let mut last: Option<T> = None;
    for trip in trips.iter_mut() {
        let value = cell(trip);
        if value.is_some() {
            last = value.clone();
        } else {
            *value = last.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::City;
    use crate::trips::read_trips_from;
    use chrono::Weekday;

    // Ten trips over January and March 2017.
    const TEN_TRIPS: &str = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
2017-01-02 08:00:00,2017-01-02 08:10:00,600,A,B,Subscriber,Male,1980
2017-01-03 09:00:00,2017-01-03 09:05:00,300,B,C,Customer,,
2017-01-09 10:00:00,2017-01-09 10:01:00,60,A,C,Subscriber,Female,1990
2017-01-14 11:00:00,2017-01-14 11:02:00,120,C,A,Subscriber,Male,
2017-01-20 12:00:00,2017-01-20 12:03:00,180,A,B,Customer,Female,1975
2017-03-06 08:00:00,2017-03-06 08:10:00,600,B,A,Subscriber,Male,1985
2017-03-07 09:00:00,2017-03-07 09:05:00,,C,B,Subscriber,Male,1986
2017-03-13 10:00:00,2017-03-13 10:01:00,60,,C,Customer,,
2017-03-18 11:00:00,2017-03-18 11:02:00,120,A,A,Subscriber,Female,2000
2017-03-24 12:00:00,2017-03-24 12:03:00,180,B,C,Subscriber,Male,1970
";

    fn raw() -> TripTable {
        read_trips_from(TEN_TRIPS.as_bytes(), City::Chicago.schema()).unwrap()
    }

    #[test]
    fn test_all_filters_keep_every_row() {
        let loaded = load_data(raw(), MonthFilter::All, DayFilter::All);
        assert_eq!(loaded.table.len(), 10);
        assert!(loaded.table.has(Column::Month));
        assert!(loaded.table.has(Column::DayOfWeek));
    }

    #[test]
    fn test_month_filter_keeps_only_that_month() {
        let loaded = load_data(raw(), MonthFilter::Only(3), DayFilter::All);
        assert_eq!(loaded.table.len(), 5);
        assert!(loaded.table.trips().iter().all(|t| t.month == Some(3)));
        let indices: Vec<usize> = loaded.table.trips().iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn test_day_filter_keeps_only_that_weekday() {
        // 2017-01-02, 2017-01-09, 2017-03-06 and 2017-03-13 are Mondays.
        let loaded = load_data(raw(), MonthFilter::All, DayFilter::Only(Weekday::Mon));
        assert_eq!(loaded.table.len(), 4);
        assert!(
            loaded
                .table
                .trips()
                .iter()
                .all(|t| t.day_of_week == Some(Weekday::Mon))
        );
    }

    #[test]
    fn test_month_and_day_filters_combine() {
        let loaded = load_data(raw(), MonthFilter::Only(1), DayFilter::Only(Weekday::Mon));
        let indices: Vec<usize> = loaded.table.trips().iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_filter_on_month_without_data_is_empty() {
        let loaded = load_data(raw(), MonthFilter::Only(6), DayFilter::All);
        assert!(loaded.table.is_empty());
        assert_eq!(loaded.nulls_before_fill, 0);
    }

    #[test]
    fn test_forward_fill_counts() {
        let loaded = load_data(raw(), MonthFilter::All, DayFilter::All);
        // gender x2, birth year x3, duration x1, start station x1
        assert_eq!(loaded.nulls_before_fill, 7);
        assert_eq!(loaded.nulls_after_fill, 0);

        let trips = loaded.table.trips();
        assert_eq!(trips[1].gender.as_deref(), Some("Male"));
        assert_eq!(trips[3].birth_year, Some(1990.0));
        assert_eq!(trips[6].trip_duration, Some(600.0));
        assert_eq!(trips[7].start_station.as_deref(), Some("C"));
    }

    #[test]
    fn test_forward_fill_leaves_leading_nulls() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
2017-01-02 08:00:00,600,A,B,Subscriber,,
2017-01-03 08:00:00,600,A,B,Subscriber,Female,
2017-01-04 08:00:00,600,A,B,Subscriber,,1999
";
        let raw = read_trips_from(csv.as_bytes(), City::Chicago.schema()).unwrap();
        let loaded = load_data(raw, MonthFilter::All, DayFilter::All);

        let trips = loaded.table.trips();
        assert_eq!(trips[0].gender, None);
        assert_eq!(trips[2].gender.as_deref(), Some("Female"));
        assert_eq!(trips[0].birth_year, None);
        assert_eq!(trips[1].birth_year, None);
        assert_eq!(loaded.nulls_after_fill, 3);
    }

    #[test]
    fn test_forward_fill_is_idempotent() {
        // Leading gaps in gender and birth year; interior gaps in start time,
        // duration, start station, user type, gender and birth year.
        let csv = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
2017-01-02 08:00:00,2017-01-02 08:10:00,600,A,B,Subscriber,,
2017-01-03 09:00:00,2017-01-03 09:05:00,,B,C,,Female,1990
2017-01-04 10:00:00,2017-01-04 10:01:00,60,,C,Customer,,
,2017-01-05 11:02:00,120,C,A,Subscriber,Male,
";
        let mut table = read_trips_from(csv.as_bytes(), City::Chicago.schema()).unwrap();
        table.columns.extend([Column::Month, Column::DayOfWeek]);
        for trip in &mut table.trips {
            trip.derive_calendar();
        }
        assert_eq!(table.null_count(), 11);

        let mut once = table.clone();
        forward_fill(&mut once);
        assert_ne!(once, table);
        assert_eq!(once.null_count(), 2);
        assert_eq!(once.trips()[0].gender, None);
        assert_eq!(once.trips()[0].birth_year, None);

        let mut twice = once.clone();
        forward_fill(&mut twice);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_filters_run_before_fill() {
        // Row 7 lacks a start station; within March its predecessor is row 6 ("C").
        let loaded = load_data(raw(), MonthFilter::Only(3), DayFilter::All);
        let trip = loaded.table.trips().iter().find(|t| t.index == 7).unwrap();
        assert_eq!(trip.start_station.as_deref(), Some("C"));
    }

    #[test]
    fn test_rows_without_start_time_only_pass_unfiltered() {
        let csv = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-01-02 08:00:00,600,A,B,Subscriber
,300,A,B,Subscriber
";
        let table = || read_trips_from(csv.as_bytes(), City::Washington.schema()).unwrap();

        let all = load_data(table(), MonthFilter::All, DayFilter::All);
        assert_eq!(all.table.len(), 2);
        // Missing start time and its derived columns are filled from row 0.
        assert_eq!(all.nulls_before_fill, 3);
        assert_eq!(all.nulls_after_fill, 0);

        let january = load_data(table(), MonthFilter::Only(1), DayFilter::All);
        assert_eq!(january.table.len(), 1);
    }
}
