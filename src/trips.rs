//! Trip records and the in-memory trip table.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{NaiveDateTime, Weekday};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use tracing::debug;

use crate::city::{Column, DatasetSchema};
use crate::filters::weekday_name;

/// One bicycle trip. Every cell may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trip {
    /// Position of the row in the source file.
    pub index: usize,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    /// Seconds.
    pub trip_duration: Option<f64>,
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<f64>,
    /// Derived from `start_time`, 1 = January.
    pub month: Option<u32>,
    /// Derived from `start_time`.
    pub day_of_week: Option<Weekday>,
}

impl Trip {
    pub fn is_null(&self, column: Column) -> bool {
        match column {
            Column::StartTime => self.start_time.is_none(),
            Column::EndTime => self.end_time.is_none(),
            Column::TripDuration => self.trip_duration.is_none(),
            Column::StartStation => self.start_station.is_none(),
            Column::EndStation => self.end_station.is_none(),
            Column::UserType => self.user_type.is_none(),
            Column::Gender => self.gender.is_none(),
            Column::BirthYear => self.birth_year.is_none(),
            Column::Month => self.month.is_none(),
            Column::DayOfWeek => self.day_of_week.is_none(),
        }
    }

    /// Cell rendered for display; missing values show as `NaN`.
    pub fn cell(&self, column: Column) -> String {
        fn text<T: ToString>(value: &Option<T>) -> String {
            value
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "NaN".to_string())
        }

        match column {
            Column::StartTime => text(&self.start_time),
            Column::EndTime => text(&self.end_time),
            Column::TripDuration => text(&self.trip_duration),
            Column::StartStation => text(&self.start_station),
            Column::EndStation => text(&self.end_station),
            Column::UserType => text(&self.user_type),
            Column::Gender => text(&self.gender),
            Column::BirthYear => text(&self.birth_year),
            Column::Month => text(&self.month),
            Column::DayOfWeek => text(&self.day_of_week.map(weekday_name)),
        }
    }

    /// Fills `month` and `day_of_week` from `start_time`.
    pub fn derive_calendar(&mut self) {
        use chrono::Datelike;

        self.month = self.start_time.map(|t| t.month());
        self.day_of_week = self.start_time.map(|t| t.weekday());
    }
}

/// Trips of one city together with the columns that table actually has.
#[derive(Debug, Clone, PartialEq)]
pub struct TripTable {
    pub(crate) schema: &'static DatasetSchema,
    pub(crate) columns: Vec<Column>,
    pub(crate) trips: Vec<Trip>,
}

impl TripTable {
    pub fn new(schema: &'static DatasetSchema, columns: Vec<Column>, trips: Vec<Trip>) -> Self {
        Self {
            schema,
            columns,
            trips,
        }
    }

    pub fn schema(&self) -> &'static DatasetSchema {
        self.schema
    }

    /// Columns present, in display order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// Number of missing cells over all present columns.
    pub fn null_count(&self) -> usize {
        self.columns
            .iter()
            .map(|&col| self.trips.iter().filter(|t| t.is_null(col)).count())
            .sum()
    }
}

/// One CSV row as it appears on disk.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time", default)]
    start_time: Option<String>,
    #[serde(rename = "End Time", default)]
    end_time: Option<String>,
    #[serde(rename = "Trip Duration", default)]
    trip_duration: Option<f64>,
    #[serde(rename = "Start Station", default)]
    start_station: Option<String>,
    #[serde(rename = "End Station", default)]
    end_station: Option<String>,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a Start/End Time cell. Blank cells are missing values.
pub fn parse_timestamp(value: &str) -> Result<Option<NaiveDateTime>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Some(ts));
        }
    }
    bail!("'{value}' is not a recognised timestamp")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Reads a city's trip CSV from disk.
pub fn read_trips(path: &Path, schema: &'static DatasetSchema) -> Result<TripTable> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_trips_from(file, schema).with_context(|| format!("reading {}", path.display()))
}

/// Reads trip rows from any CSV source.
///
/// Only the schema's columns are kept; a missing required column is an error
/// and extra columns are ignored.
pub fn read_trips_from<R: Read>(source: R, schema: &'static DatasetSchema) -> Result<TripTable> {
    let mut reader = ReaderBuilder::new().trim(Trim::Headers).from_reader(source);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let mut columns = Vec::new();
    for &column in schema.columns() {
        if headers.iter().any(|h| h == column.header()) {
            columns.push(column);
        } else if !column.is_optional() {
            bail!("missing '{}' column", column.header());
        }
    }
    let keep = |column: Column| columns.contains(&column);

    let mut trips = Vec::new();
    for (index, result) in reader.deserialize::<RawTrip>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {index}"))?;

        let start_time = parse_timestamp(raw.start_time.as_deref().unwrap_or(""))
            .with_context(|| format!("CSV row {index}: Start Time"))?;
        let end_time = if keep(Column::EndTime) {
            parse_timestamp(raw.end_time.as_deref().unwrap_or(""))
                .with_context(|| format!("CSV row {index}: End Time"))?
        } else {
            None
        };

        trips.push(Trip {
            index,
            start_time,
            end_time,
            trip_duration: raw.trip_duration,
            start_station: non_blank(raw.start_station),
            end_station: non_blank(raw.end_station),
            user_type: non_blank(raw.user_type),
            gender: if keep(Column::Gender) {
                non_blank(raw.gender)
            } else {
                None
            },
            birth_year: if keep(Column::BirthYear) {
                raw.birth_year
            } else {
                None
            },
            month: None,
            day_of_week: None,
        });
    }

    debug!(rows = trips.len(), columns = columns.len(), "Trip CSV read");
    Ok(TripTable::new(schema, columns, trips))
}
