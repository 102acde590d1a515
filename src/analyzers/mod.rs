//! Descriptive statistics over a prepared trip table.
//!
//! Each aggregator is independent and only reads the table; [`build_report`]
//! runs all three for JSON output.

pub mod durations;
pub mod stations;
pub mod types;
pub mod users;
pub mod utility;

use crate::filters::Filters;
use crate::trips::TripTable;
use types::Report;

/// Runs every aggregator over `table`.
pub fn build_report(filters: Filters, table: &TripTable) -> Report {
    Report {
        filters,
        trips: table.len(),
        stations: stations::station_stats(table),
        durations: durations::trip_duration_stats(table),
        users: users::user_stats(table),
    }
}
