use crate::analyzers::types::{DurationStats, Hms};
use crate::analyzers::utility::mean;
use crate::trips::TripTable;

/// Sums and averages the Trip Duration column. Missing durations are skipped.
pub fn trip_duration_stats(table: &TripTable) -> DurationStats {
    let durations: Vec<f64> = table
        .trips()
        .iter()
        .filter_map(|t| t.trip_duration)
        .collect();

    let total_seconds: f64 = durations.iter().sum();
    let mean_seconds = mean(&durations);

    DurationStats {
        total_seconds,
        total: Hms::from_seconds(total_seconds),
        mean_seconds,
        mean: mean_seconds.map(Hms::from_seconds),
    }
}
