//! Month/day filters and the interactive filter collector.

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use chrono::Weekday;
use serde::Serialize;
use tracing::info;

use crate::city::City;
use crate::prompt::{Answer, ChoiceError, PromptError, Prompter};

static MONTHS: &[&str] = &["january", "february", "march", "april", "may", "june"];

static WEEKDAYS: &[(Weekday, &str)] = &[
    (Weekday::Mon, "Monday"),
    (Weekday::Tue, "Tuesday"),
    (Weekday::Wed, "Wednesday"),
    (Weekday::Thu, "Thursday"),
    (Weekday::Fri, "Friday"),
    (Weekday::Sat, "Saturday"),
    (Weekday::Sun, "Sunday"),
];

/// Full English name of a weekday, e.g. `"Monday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAYS[day.num_days_from_monday() as usize].1
}

/// Month selection. Only the first six months have data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MonthFilter {
    All,
    /// Month number, 1 = January.
    Only(u32),
}

impl MonthFilter {
    pub fn matches(self, month: Option<u32>) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Only(wanted) => month == Some(wanted),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let answer = s.trim().to_lowercase();
        if answer == "all" {
            return Ok(MonthFilter::All);
        }
        MONTHS
            .iter()
            .position(|name| *name == answer)
            .map(|idx| MonthFilter::Only(idx as u32 + 1))
            .ok_or_else(|| ChoiceError::new(s, "all, january, february, ..., june"))
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Only(n) => {
                let name = (*n as usize)
                    .checked_sub(1)
                    .and_then(|idx| MONTHS.get(idx))
                    .copied()
                    .unwrap_or("unknown");
                f.write_str(name)
            }
        }
    }
}

/// Day-of-week selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayFilter {
    All,
    Only(Weekday),
}

impl DayFilter {
    pub fn matches(self, day: Option<Weekday>) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Only(wanted) => day == Some(wanted),
        }
    }
}

impl FromStr for DayFilter {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let answer = s.trim().to_lowercase();
        if answer == "all" {
            return Ok(DayFilter::All);
        }
        WEEKDAYS
            .iter()
            .find(|(_, name)| name.to_lowercase() == answer)
            .map(|(day, _)| DayFilter::Only(*day))
            .ok_or_else(|| ChoiceError::new(s, "all, monday, tuesday, ..., sunday"))
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Only(day) => f.write_str(&weekday_name(*day).to_lowercase()),
        }
    }
}

/// A validated (city, month, day) selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Filters {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl Filters {
    /// No month or day restriction.
    pub fn unfiltered(city: City) -> Self {
        Self {
            city,
            month: MonthFilter::All,
            day: DayFilter::All,
        }
    }
}

const START_MESSAGE: &str = "Would you like to enter some filters? | Yes | No |";
const CITY_MESSAGE: &str =
    "Which city would you like to see data from? | Chicago | New York | Washington |?";
const MONTH_MESSAGE: &str = "How do you want to filter the data: All, January, February, ..., June?";
const DAY_MESSAGE: &str = "Select which day of the week: All, Monday, Tuesday, ... Sunday";

/// Asks for city, month and day, re-asking each question until it gets a
/// valid answer.
///
/// Returns `None` when the user declines to enter filters.
pub fn collect_filters<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<Option<Filters>, PromptError> {
    prompter.say("\nUS BIKESHARE DATA ANALYSIS")?;
    prompter.say("\nSection A: Get Filters")?;
    prompter.say(&"-".repeat(40))?;

    let wants_filters: Answer = prompter.ask_until_valid(START_MESSAGE)?;
    if !wants_filters.is_yes() {
        prompter.say("Good bye!")?;
        return Ok(None);
    }

    let city: City = prompter.ask_until_valid(CITY_MESSAGE)?;
    let month: MonthFilter = prompter.ask_until_valid(MONTH_MESSAGE)?;
    let day: DayFilter = prompter.ask_until_valid(DAY_MESSAGE)?;
    prompter.say(&"=".repeat(40))?;

    info!(city = %city, month = %month, day = %day, "Filters selected");
    Ok(Some(Filters { city, month, day }))
}
