use std::collections::BTreeMap;

use crate::analyzers::types::{Demographics, UserStats};
use crate::analyzers::utility::count_by;
use crate::trips::TripTable;

/// Counts trips per user type and, when the table's schema records them,
/// per gender along with birth-year extremes.
///
/// Gender and birth year are never read for a schema that lacks them.
pub fn user_stats(table: &TripTable) -> UserStats {
    let trips = table.trips();
    let user_type_counts = count_by(trips.iter().filter_map(|t| t.user_type.as_deref()));

    let demographics = if table.schema().has_demographics() {
        Some(demographics(table))
    } else {
        None
    };

    UserStats {
        user_type_counts,
        demographics,
    }
}

fn demographics(table: &TripTable) -> Demographics {
    let trips = table.trips();

    let gender_counts = count_by(trips.iter().filter_map(|t| t.gender.as_deref()));
    let years: Vec<i64> = trips
        .iter()
        .filter_map(|t| t.birth_year)
        .map(|y| y.trunc() as i64)
        .collect();

    let year_counts = count_by_year(&years);
    // Ties go to the earlier year.
    let most_common_birth_year = year_counts
        .iter()
        .max_by(|(a_year, a_count), (b_year, b_count)| {
            a_count.cmp(b_count).then_with(|| b_year.cmp(a_year))
        })
        .map(|(year, _)| *year);

    Demographics {
        gender_counts,
        earliest_birth_year: years.iter().min().copied(),
        most_recent_birth_year: years.iter().max().copied(),
        most_common_birth_year,
    }
}

fn count_by_year(years: &[i64]) -> BTreeMap<i64, usize> {
    let mut counts = BTreeMap::new();
    for &year in years {
        *counts.entry(year).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::{City, Column};
    use crate::trips::Trip;

    fn trip(user_type: &str, gender: Option<&str>, birth_year: Option<f64>) -> Trip {
        Trip {
            user_type: Some(user_type.to_string()),
            gender: gender.map(str::to_string),
            birth_year,
            ..Default::default()
        }
    }

    fn trips() -> Vec<Trip> {
        vec![
            trip("Subscriber", Some("Male"), Some(1980.0)),
            trip("Subscriber", Some("Female"), Some(1992.0)),
            trip("Customer", None, Some(1992.0)),
            trip("Subscriber", Some("Male"), Some(1965.0)),
            trip("Dependent", Some("Male"), None),
        ]
    }

    fn table(city: City, trips: Vec<Trip>) -> TripTable {
        let mut columns = vec![Column::UserType];
        if city.schema().has_demographics() {
            columns.extend([Column::Gender, Column::BirthYear]);
        }
        TripTable::new(city.schema(), columns, trips)
    }

    #[test]
    fn test_user_type_counts() {
        let stats = user_stats(&table(City::Chicago, trips()));
        let counts: Vec<(&str, usize)> = stats
            .user_type_counts
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(
            counts,
            vec![("Customer", 1), ("Dependent", 1), ("Subscriber", 3)]
        );
    }

    #[test]
    fn test_demographics() {
        let stats = user_stats(&table(City::NewYork, trips()));
        let demo = stats.demographics.unwrap();

        assert_eq!(demo.gender_counts.get("Male"), Some(&3));
        assert_eq!(demo.gender_counts.get("Female"), Some(&1));
        assert_eq!(demo.earliest_birth_year, Some(1965));
        assert_eq!(demo.most_recent_birth_year, Some(1992));
        assert_eq!(demo.most_common_birth_year, Some(1992));
    }

    #[test]
    fn test_most_common_birth_year_tie_goes_to_earlier_year() {
        let stats = user_stats(&table(
            City::Chicago,
            vec![
                trip("Subscriber", None, Some(1990.0)),
                trip("Subscriber", None, Some(1970.0)),
            ],
        ));
        assert_eq!(stats.demographics.unwrap().most_common_birth_year, Some(1970));
    }

    #[test]
    fn test_washington_never_reads_demographics() {
        // Values present on the rows must still be ignored.
        let stats = user_stats(&table(City::Washington, trips()));
        assert_eq!(stats.demographics, None);
        assert_eq!(stats.user_type_counts.get("Subscriber"), Some(&3));
    }
}
