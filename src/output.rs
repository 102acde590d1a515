//! Text and JSON rendering of the loader summary and aggregator results.
//!
//! The `report_*` functions time their own aggregation and print the
//! elapsed wall-clock seconds after the statistics.

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Instant;

use anyhow::Result;
use tracing::debug;

use crate::analyzers::durations::trip_duration_stats;
use crate::analyzers::stations::station_stats;
use crate::analyzers::types::{Popular, Report, format_seconds};
use crate::analyzers::users::user_stats;
use crate::city::City;
use crate::loader::LoadedTrips;
use crate::trips::TripTable;

fn heading<W: Write>(out: &mut W, title: &str) -> std::io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(40))
}

fn footer<W: Write>(out: &mut W, started: Instant) -> std::io::Result<()> {
    let elapsed = started.elapsed();
    writeln!(out, "\nThis calculation took {} seconds.", elapsed.as_secs_f64())?;
    writeln!(out, "{}", "-".repeat(40))
}

fn popular_line(popular: &Option<Popular>) -> String {
    match popular {
        Some(p) => format!("{} ({} trips)", p.label, p.count),
        None => "n/a".to_string(),
    }
}

fn write_counts<W: Write>(
    out: &mut W,
    title: &str,
    counts: &BTreeMap<String, usize>,
) -> std::io::Result<()> {
    writeln!(out, "Count by {title}:")?;
    if counts.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (label, count) in counts {
        writeln!(out, "  {label}: {count}")?;
    }
    Ok(())
}

fn year_line(year: Option<i64>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "n/a".to_string())
}

/// Prints the loader banner and missing-value counts.
pub fn report_load_summary<W: Write>(out: &mut W, loaded: &LoadedTrips) -> Result<()> {
    heading(out, "SECTION B: Loading Data")?;
    writeln!(
        out,
        "Number of NaN values in our DataFrame before filling: {}",
        loaded.nulls_before_fill
    )?;
    writeln!(
        out,
        "Number of NaN values in our DataFrame after filling:  {}",
        loaded.nulls_after_fill
    )?;
    writeln!(out, "Trips matching the filters: {}", loaded.table.len())?;
    Ok(())
}

/// Prints the most popular stations and trip.
#[tracing::instrument(skip_all, fields(trips = table.len()))]
pub fn report_station_stats<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    heading(out, "SECTION C: Station Stats")?;
    writeln!(out, "\nCalculating The Most Popular Stations and Trip...\n")?;
    let started = Instant::now();

    let stats = station_stats(table);
    writeln!(out, "Most common start station: {}", popular_line(&stats.start_station))?;
    writeln!(out, "Most common end station: {}", popular_line(&stats.end_station))?;
    writeln!(out, "The most popular trip is from {}", popular_line(&stats.journey))?;

    debug!(elapsed_us = started.elapsed().as_micros() as u64, "Station stats computed");
    footer(out, started)?;
    Ok(())
}

/// Prints total and mean trip duration.
#[tracing::instrument(skip_all, fields(trips = table.len()))]
pub fn report_trip_duration_stats<W: Write>(out: &mut W, table: &TripTable) -> Result<()> {
    heading(out, "SECTION D: Trip Duration Stats")?;
    writeln!(out, "\nCalculating Trip Duration...\n")?;
    let started = Instant::now();

    let stats = trip_duration_stats(table);
    writeln!(
        out,
        "Total trips duration: {} ({} seconds)",
        stats.total,
        format_seconds(stats.total_seconds)
    )?;
    match (stats.mean, stats.mean_seconds) {
        (Some(mean), Some(seconds)) => {
            writeln!(
                out,
                "Mean travel time: {mean} ({} seconds)",
                format_seconds(seconds)
            )?
        }
        _ => writeln!(out, "Mean travel time: n/a")?,
    }

    debug!(elapsed_us = started.elapsed().as_micros() as u64, "Trip duration stats computed");
    footer(out, started)?;
    Ok(())
}

/// Prints user-type counts, plus gender and birth-year statistics where the
/// city's dataset records them.
#[tracing::instrument(skip_all, fields(city = %city, trips = table.len()))]
pub fn report_user_stats<W: Write>(out: &mut W, city: City, table: &TripTable) -> Result<()> {
    heading(out, "SECTION E: User Stats")?;
    writeln!(out, "\nCalculating User Stats...\n")?;
    let started = Instant::now();

    let stats = user_stats(table);
    write_counts(out, "User Type", &stats.user_type_counts)?;

    match &stats.demographics {
        Some(demo) => {
            write_counts(out, "Gender", &demo.gender_counts)?;
            writeln!(out, "Earliest birth year: {}", year_line(demo.earliest_birth_year))?;
            writeln!(
                out,
                "Most recent birth year: {}",
                year_line(demo.most_recent_birth_year)
            )?;
            writeln!(
                out,
                "Most common birth year: {}",
                year_line(demo.most_common_birth_year)
            )?;
        }
        None => writeln!(out, "Gender and birth year values not available for {city}")?,
    }

    debug!(elapsed_us = started.elapsed().as_micros() as u64, "User stats computed");
    footer(out, started)?;
    Ok(())
}

/// Prints all three aggregator sections.
pub fn report_all<W: Write>(out: &mut W, city: City, table: &TripTable) -> Result<()> {
    report_station_stats(out, table)?;
    report_trip_duration_stats(out, table)?;
    report_user_stats(out, city, table)?;
    Ok(())
}

/// Writes a [`Report`] as pretty-printed JSON.
pub fn print_json<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}
