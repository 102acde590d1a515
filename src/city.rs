//! Supported cities, their data files, and the columns each dataset carries.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::prompt::ChoiceError;

/// A city with a bikeshare dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYork,
    Washington,
}

impl City {
    /// Every city, in prompt order.
    pub const ALL: [City; 3] = [City::Chicago, City::NewYork, City::Washington];

    /// Lower-case name accepted at the city prompt.
    pub fn key(self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYork => "new york",
            City::Washington => "washington",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            City::Chicago => "Chicago",
            City::NewYork => "New York",
            City::Washington => "Washington",
        }
    }

    /// File name of the city's trip CSV, relative to the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYork => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }

    /// Columns available in this city's dataset.
    pub fn schema(self) -> &'static DatasetSchema {
        match self {
            City::Chicago | City::NewYork => &FULL_SCHEMA,
            City::Washington => &BASIC_SCHEMA,
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for City {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let answer = s.trim().to_lowercase();
        City::ALL
            .into_iter()
            .find(|city| city.key() == answer)
            .ok_or_else(|| ChoiceError::new(s, "chicago, new york, washington"))
    }
}

/// A column of the trip table, including the two derived calendar columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Column {
    StartTime,
    EndTime,
    TripDuration,
    StartStation,
    EndStation,
    UserType,
    Gender,
    BirthYear,
    Month,
    DayOfWeek,
}

impl Column {
    /// Header name in the CSV (or the derived column's name).
    pub fn header(self) -> &'static str {
        match self {
            Column::StartTime => "Start Time",
            Column::EndTime => "End Time",
            Column::TripDuration => "Trip Duration",
            Column::StartStation => "Start Station",
            Column::EndStation => "End Station",
            Column::UserType => "User Type",
            Column::Gender => "Gender",
            Column::BirthYear => "Birth Year",
            Column::Month => "month",
            Column::DayOfWeek => "day_of_week",
        }
    }

    /// Derived columns are computed from Start Time, never read from the file.
    pub fn is_derived(self) -> bool {
        matches!(self, Column::Month | Column::DayOfWeek)
    }

    /// Columns a dataset may omit without the load failing.
    pub fn is_optional(self) -> bool {
        matches!(self, Column::EndTime)
    }
}

/// The set of source columns a city's dataset provides.
#[derive(Debug, PartialEq, Eq)]
pub struct DatasetSchema {
    columns: &'static [Column],
}

static FULL_SCHEMA: DatasetSchema = DatasetSchema {
    columns: &[
        Column::StartTime,
        Column::EndTime,
        Column::TripDuration,
        Column::StartStation,
        Column::EndStation,
        Column::UserType,
        Column::Gender,
        Column::BirthYear,
    ],
};

static BASIC_SCHEMA: DatasetSchema = DatasetSchema {
    columns: &[
        Column::StartTime,
        Column::EndTime,
        Column::TripDuration,
        Column::StartStation,
        Column::EndStation,
        Column::UserType,
    ],
};

impl DatasetSchema {
    pub fn columns(&self) -> &'static [Column] {
        self.columns
    }

    pub fn has(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Whether gender and birth-year statistics can be computed.
    pub fn has_demographics(&self) -> bool {
        self.has(Column::Gender) && self.has(Column::BirthYear)
    }
}
