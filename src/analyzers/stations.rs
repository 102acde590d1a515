use crate::analyzers::types::{Popular, StationStats};
use crate::analyzers::utility::{count_by, most_common};
use crate::trips::TripTable;

/// Label identifying a station-to-station route.
pub fn journey(start: &str, end: &str) -> String {
    format!("{start} to {end}")
}

fn popular<'a>(labels: impl IntoIterator<Item = &'a str>) -> Option<Popular> {
    let counts = count_by(labels);
    most_common(&counts).map(|(label, count)| Popular {
        label: label.to_string(),
        count,
    })
}

/// Finds the most used start station, end station and journey.
///
/// Trips with a missing station are left out of the counts they affect.
pub fn station_stats(table: &TripTable) -> StationStats {
    let trips = table.trips();

    let journeys: Vec<String> = trips
        .iter()
        .filter_map(|t| match (&t.start_station, &t.end_station) {
            (Some(start), Some(end)) => Some(journey(start, end)),
            _ => None,
        })
        .collect();

    StationStats {
        start_station: popular(trips.iter().filter_map(|t| t.start_station.as_deref())),
        end_station: popular(trips.iter().filter_map(|t| t.end_station.as_deref())),
        journey: popular(journeys.iter().map(String::as_str)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::{City, Column};
    use crate::trips::Trip;

    fn trip(start: Option<&str>, end: Option<&str>) -> Trip {
        Trip {
            start_station: start.map(str::to_string),
            end_station: end.map(str::to_string),
            ..Default::default()
        }
    }

    fn table(trips: Vec<Trip>) -> TripTable {
        TripTable::new(
            City::Chicago.schema(),
            vec![Column::StartStation, Column::EndStation],
            trips,
        )
    }

    #[test]
    fn test_station_stats_counts() {
        let stats = station_stats(&table(vec![
            trip(Some("Canal St"), Some("Clark St")),
            trip(Some("Canal St"), Some("State St")),
            trip(Some("Wells St"), Some("Clark St")),
            trip(Some("Canal St"), Some("Clark St")),
        ]));

        assert_eq!(
            stats.start_station,
            Some(Popular {
                label: "Canal St".into(),
                count: 3
            })
        );
        assert_eq!(stats.end_station.unwrap().label, "Clark St");
        assert_eq!(
            stats.journey,
            Some(Popular {
                label: "Canal St to Clark St".into(),
                count: 2
            })
        );
    }

    #[test]
    fn test_lexicographically_last_label_does_not_beat_higher_count() {
        let stats = station_stats(&table(vec![
            trip(Some("Adams St"), Some("B")),
            trip(Some("Adams St"), Some("B")),
            trip(Some("Zoo"), Some("B")),
        ]));
        assert_eq!(stats.start_station.unwrap().label, "Adams St");
    }

    #[test]
    fn test_missing_stations_are_skipped() {
        let stats = station_stats(&table(vec![
            trip(None, Some("B")),
            trip(Some("A"), None),
        ]));
        assert_eq!(stats.start_station.unwrap().label, "A");
        assert_eq!(stats.end_station.unwrap().label, "B");
        assert_eq!(stats.journey, None);
    }

    #[test]
    fn test_empty_table() {
        let stats = station_stats(&table(vec![]));
        assert_eq!(stats.start_station, None);
        assert_eq!(stats.end_station, None);
        assert_eq!(stats.journey, None);
    }
}
