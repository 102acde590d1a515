//! Five-rows-at-a-time browsing of the working table.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::city::Column;
use crate::prompt::{Answer, PromptError, Prompter};
use crate::trips::{Trip, TripTable};

pub const PAGE_SIZE: usize = 5;

const BROWSE_MESSAGE: &str = "\nWould you like to see the next five rows of data? | Yes | No |";

/// Contiguous, non-overlapping pages of [`PAGE_SIZE`] trips.
#[derive(Debug, Clone)]
pub struct Pager<'a> {
    trips: &'a [Trip],
    offset: usize,
}

impl<'a> Pager<'a> {
    pub fn new(trips: &'a [Trip]) -> Self {
        Self { trips, offset: 0 }
    }

    /// Position of the first row not yet returned.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.offset >= self.trips.len()
    }
}

impl<'a> Iterator for Pager<'a> {
    type Item = &'a [Trip];

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_exhausted() {
            return None;
        }
        let end = (self.offset + PAGE_SIZE).min(self.trips.len());
        let page = &self.trips[self.offset..end];
        self.offset = end;
        Some(page)
    }
}

/// Shows pages for as long as the user answers yes.
///
/// One invalid answer is re-asked; a second one ends browsing like "no".
/// Returns the number of pages shown.
pub fn browse_rows<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    table: &TripTable,
) -> Result<usize, PromptError> {
    let mut pager = Pager::new(table.trips());
    let mut shown = 0;

    loop {
        if pager.is_exhausted() {
            prompter.say("No more rows to display.")?;
            break;
        }

        match prompter.ask::<Answer>(BROWSE_MESSAGE, 1)? {
            Ok(Answer::Yes) => {}
            Ok(Answer::No) => break,
            Err(err) => {
                debug!(error = %err, "Ending row browser after repeated invalid answer");
                break;
            }
        }

        let start = pager.offset();
        let Some(page) = pager.next() else { break };
        let out = prompter.output();
        writeln!(out, "{}", "_".repeat(40))?;
        writeln!(
            out,
            "Displaying data from row #{} to row #{}:",
            start,
            start + page.len()
        )?;
        write_rows(out, table.columns(), page)?;
        writeln!(out, "{}", "_".repeat(40))?;
        shown += 1;
    }

    Ok(shown)
}

/// Writes trips as an aligned text table, led by the source row index.
pub fn write_rows<W: Write>(out: &mut W, columns: &[Column], trips: &[Trip]) -> std::io::Result<()> {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(trips.len() + 1);
    rows.push(
        std::iter::once(String::new())
            .chain(columns.iter().map(|c| c.header().to_string()))
            .collect(),
    );
    for trip in trips {
        rows.push(
            std::iter::once(trip.index.to_string())
                .chain(columns.iter().map(|&c| trip.cell(c)))
                .collect(),
        );
    }

    let widths: Vec<usize> = (0..=columns.len())
        .map(|i| rows.iter().map(|r| r[i].chars().count()).max().unwrap_or(0))
        .collect();

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:>width$}"))
            .collect();
        writeln!(out, "{}", line.join("  "))?;
    }
    Ok(())
}
